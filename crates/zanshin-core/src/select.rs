//! Interactive selection of the accounts to onboard.
//!
//! Runs before the orchestrator so the fan-out itself never blocks on
//! operator input; generic over reader/writer so non-interactive callers
//! and tests can drive it.

use std::io::{BufRead, Write};

use crate::account::Account;

const MIN_NAME_LEN: usize = 3;

/// Ask the operator, account by account, whether to onboard it and under
/// what name. Confirmation defaults to yes; the name defaults to the
/// account's current name and is re-prompted until it is at least 3
/// characters after trimming. Returns only the accepted accounts, with
/// their (possibly edited) names applied.
///
/// An empty result is a valid "nothing to do" outcome, not an error.
pub fn select_accounts<R, W>(
    mut accounts: Vec<Account>,
    mut reader: R,
    mut writer: W,
) -> std::io::Result<Vec<Account>>
where
    R: BufRead,
    W: Write,
{
    for account in &mut accounts {
        account.onboard = confirm_onboard(account, &mut reader, &mut writer)?;
        if !account.onboard {
            continue;
        }
        account.name = prompt_name(&account.name, &mut reader, &mut writer)?;
    }
    Ok(accounts.into_iter().filter(|a| a.onboard).collect())
}

fn confirm_onboard<R: BufRead, W: Write>(
    account: &Account,
    reader: &mut R,
    writer: &mut W,
) -> std::io::Result<bool> {
    loop {
        write!(
            writer,
            "Onboard AWS account {} ({})? [Y/n]: ",
            account.name, account.id
        )?;
        writer.flush()?;
        let answer = read_line(reader)?;
        match answer.trim() {
            "" | "y" | "Y" | "yes" | "Yes" | "YES" => return Ok(true),
            "n" | "N" | "no" | "No" | "NO" => return Ok(false),
            _ => writeln!(writer, "Please answer y or n.")?,
        }
    }
}

fn prompt_name<R: BufRead, W: Write>(
    default: &str,
    reader: &mut R,
    writer: &mut W,
) -> std::io::Result<String> {
    write!(writer, "Scan target name [{default}]: ")?;
    writer.flush()?;
    let mut name = read_with_default(reader, default)?;
    while name.trim().len() < MIN_NAME_LEN {
        write!(
            writer,
            "Name must be at least {MIN_NAME_LEN} characters. Scan target name [{default}]: "
        )?;
        writer.flush()?;
        name = read_with_default(reader, default)?;
    }
    Ok(name)
}

fn read_with_default<R: BufRead>(reader: &mut R, default: &str) -> std::io::Result<String> {
    let line = read_line(reader)?;
    if line.trim().is_empty() {
        Ok(default.to_string())
    } else {
        Ok(line)
    }
}

/// One line of operator input. A closed stream is an error, not an answer:
/// treating EOF as the default would silently accept every remaining
/// account, and the name re-prompt would never terminate.
fn read_line<R: BufRead>(reader: &mut R) -> std::io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "input closed during account selection",
        ));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountStatus;
    use std::io::Cursor;

    fn candidate(id: &str, name: &str) -> Account {
        Account::new(
            id,
            name,
            format!("arn:aws:organizations::111111111111:account/o-test/{id}"),
            format!("{name}@example.com"),
            AccountStatus::Active,
        )
    }

    fn select(accounts: Vec<Account>, input: &str) -> (Vec<Account>, String) {
        let mut output = Vec::new();
        let selected =
            select_accounts(accounts, Cursor::new(input.as_bytes()), &mut output).unwrap();
        (selected, String::from_utf8(output).unwrap())
    }

    #[test]
    fn default_answer_accepts_with_current_name() {
        let (selected, _) = select(vec![candidate("1", "production")], "\n\n");
        assert_eq!(selected.len(), 1);
        assert!(selected[0].onboard);
        assert_eq!(selected[0].name, "production");
    }

    #[test]
    fn declined_accounts_are_dropped() {
        let accounts = vec![candidate("1", "alpha"), candidate("2", "beta")];
        let (selected, _) = select(accounts, "n\ny\n\n");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "2");
    }

    #[test]
    fn short_names_are_rejected_until_valid() {
        // "ab" (2 chars) and " a " (1 visible char) are rejected; "abc" lands.
        let (selected, transcript) = select(vec![candidate("1", "prod")], "y\nab\n a \nabc\n");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "abc");
        assert_eq!(
            transcript.matches("Name must be at least 3 characters").count(),
            2
        );
    }

    #[test]
    fn empty_name_falls_back_to_the_account_name() {
        let (selected, _) = select(vec![candidate("1", "production")], "yes\n\n");
        assert_eq!(selected[0].name, "production");
    }

    #[test]
    fn garbled_confirmation_is_reprompted() {
        let (selected, transcript) = select(vec![candidate("1", "prod")], "maybe\nn\n");
        assert!(selected.is_empty());
        assert!(transcript.contains("Please answer y or n."));
    }

    #[test]
    fn nothing_selected_is_a_valid_outcome() {
        let accounts = vec![candidate("1", "alpha"), candidate("2", "beta")];
        let (selected, _) = select(accounts, "n\nn\n");
        assert!(selected.is_empty());
    }

    #[test]
    fn closed_input_at_the_confirm_prompt_is_an_error() {
        // No trailing answer for the second account: the selection must not
        // silently accept it.
        let accounts = vec![candidate("1", "alpha"), candidate("2", "beta")];
        let mut output = Vec::new();
        let err = select_accounts(accounts, Cursor::new(b"n\n" as &[u8]), &mut output).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn closed_input_at_the_name_prompt_terminates_with_an_error() {
        // The account name "ab" is below the minimum, so an EOF-as-default
        // reading would re-prompt forever. It must error out instead.
        let mut output = Vec::new();
        let err = select_accounts(
            vec![candidate("1", "ab")],
            Cursor::new(b"y\n" as &[u8]),
            &mut output,
        )
        .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn edited_name_is_persisted_onto_the_account() {
        let (selected, _) = select(vec![candidate("1", "old-name")], "y\nshiny new name\n");
        assert_eq!(selected[0].name, "shiny new name");
        assert_eq!(selected[0].id, "1");
    }
}
