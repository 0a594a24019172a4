use async_trait::async_trait;
use futures::stream::Stream;
use futures::TryStreamExt;
use std::collections::VecDeque;

use crate::account::Account;
use crate::error::Result;

// ---------------------------------------------------------------------------
// OrganizationApi
// ---------------------------------------------------------------------------

/// One page of accounts from the organization-management backend.
#[derive(Debug, Clone, Default)]
pub struct AccountPage {
    pub accounts: Vec<Account>,
    /// Opaque cursor; present iff more pages remain.
    pub next_token: Option<String>,
}

/// The three-operation surface the fan-out consumes from the
/// organization-management backend. Nothing else of that API is depended on.
#[async_trait]
pub trait OrganizationApi: Send + Sync {
    /// Id of the organization's management account.
    async fn management_account_id(&self) -> Result<String>;

    /// One page of accounts; `next_token` comes from the previous page,
    /// `None` requests the first page.
    async fn list_accounts(&self, next_token: Option<&str>) -> Result<AccountPage>;
}

// ---------------------------------------------------------------------------
// Enumerator
// ---------------------------------------------------------------------------

struct Pager {
    buffered: VecDeque<Account>,
    next_token: Option<String>,
    exhausted: bool,
}

/// Lazy sequence of every account in the organization, transparently
/// following continuation tokens. Performs no filtering; backend errors
/// propagate unmodified and are not retried.
pub fn accounts<A>(api: &A) -> impl Stream<Item = Result<Account>> + '_
where
    A: OrganizationApi + ?Sized,
{
    let state = Pager {
        buffered: VecDeque::new(),
        next_token: None,
        exhausted: false,
    };
    futures::stream::try_unfold(state, move |mut state| async move {
        loop {
            if let Some(account) = state.buffered.pop_front() {
                return Ok(Some((account, state)));
            }
            if state.exhausted {
                return Ok(None);
            }
            let page = api.list_accounts(state.next_token.as_deref()).await?;
            state.buffered = page.accounts.into();
            state.exhausted = page.next_token.is_none();
            state.next_token = page.next_token;
        }
    })
}

/// Eagerly collect the whole organization. Used by the interactive path,
/// which needs the full candidate list up front.
pub async fn collect_accounts<A>(api: &A) -> Result<Vec<Account>>
where
    A: OrganizationApi + ?Sized,
{
    accounts(api).try_collect().await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
