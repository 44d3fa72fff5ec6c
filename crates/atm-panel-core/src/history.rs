use atm_api_types::{Action, TransactionRecord};

use crate::amount::{Amount, format_amount};

/// Append-only, insertion-ordered log of confirmed transfers for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLog {
    records: Vec<TransactionRecord>,
}

impl TransactionLog {
    pub fn record(&mut self, action: Action, amount: Amount, timestamp_epoch_ms: u64) -> &TransactionRecord {
        self.records.push(TransactionRecord {
            action,
            amount: amount.signed_for(action),
            timestamp_epoch_ms,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lines of the form `<action> <abs(amount)> <currency> - <timestamp>`.
    ///
    /// `localize` turns epoch milliseconds into the user's local time string.
    pub fn render<'a, F>(&'a self, currency: &'a str, decimals: u8, localize: F) -> impl Iterator<Item = String> + 'a
    where
        F: Fn(u64) -> String + 'a,
    {
        self.records.iter().map(move |record| {
            format!(
                "{} {} {} - {}",
                record.action,
                format_amount(record.amount.unsigned_abs(), decimals),
                currency,
                localize(record.timestamp_epoch_ms)
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_keep_insertion_order_and_sign() {
        let mut log = TransactionLog::default();
        let one_and_half = Amount::parse("1.5", 18).expect("valid");
        let half = Amount::parse("0.5", 18).expect("valid");

        log.record(Action::Deposit, one_and_half, 1_000);
        log.record(Action::Withdraw, half, 2_000);

        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].action, Action::Deposit);
        assert!(log.records()[0].amount.is_positive());
        assert_eq!(log.records()[1].action, Action::Withdraw);
        assert_eq!(log.records()[1].amount, half.signed_for(Action::Withdraw));
    }

    #[test]
    fn render_prints_absolute_amounts() {
        let mut log = TransactionLog::default();
        log.record(Action::Withdraw, Amount::parse("0.5", 18).expect("valid"), 42);

        let lines: Vec<String> = log.render("ETH", 18, |ms| format!("t={ms}")).collect();

        assert_eq!(lines, vec!["Withdraw 0.5 ETH - t=42".to_owned()]);
    }

    #[test]
    fn empty_log_renders_nothing() {
        let log = TransactionLog::default();
        assert!(log.is_empty());
        assert_eq!(log.render("ETH", 18, |ms| ms.to_string()).count(), 0);
    }
}
