//! Journal entry composition and double-entry validation
//!
//! An entry is postable when its debits equal its credits and the total is
//! above zero. Amounts are [`Decimal`], so `0.1 + 0.2 == 0.3` holds and the
//! equality check needs no tolerance.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::types::{EntryType, LineField};

/// Lines an entry always keeps while being composed
pub const MIN_LINES: usize = 2;

/// Fractional digits an amount may carry
pub const AMOUNT_SCALE: u32 = 2;

/// Largest amount a single line accepts (one quadrillion)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// One debit or credit line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub id: u64,
    pub account_code: String,
    pub description: String,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
}

impl JournalLine {
    fn blank(id: u64) -> Self {
        Self {
            id,
            account_code: String::new(),
            description: String::new(),
            debit: None,
            credit: None,
        }
    }

    pub fn debit_amount(&self) -> Decimal {
        self.debit.unwrap_or_default()
    }

    pub fn credit_amount(&self) -> Decimal {
        self.credit.unwrap_or_default()
    }
}

/// Header fields of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryHeader {
    pub date: NaiveDate,
    pub reference: String,
    pub entry_type: Option<EntryType>,
    pub memo: String,
}

impl Default for EntryHeader {
    fn default() -> Self {
        Self {
            date: Utc::now().date_naive(),
            reference: String::new(),
            entry_type: None,
            memo: String::new(),
        }
    }
}

impl EntryHeader {
    /// Replace one header field from form input.
    ///
    /// Dates are `YYYY-MM-DD`; a blank entry type clears it.
    pub fn set_field(&mut self, field: &str, value: &str) -> CoreResult<()> {
        let invalid = || CoreError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        };
        match field {
            "date" => {
                self.date =
                    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
            }
            "reference" => self.reference = value.trim().to_string(),
            "entry_type" => {
                self.entry_type = match value.trim() {
                    "" => None,
                    v => Some(v.parse().map_err(|_| invalid())?),
                };
            }
            "memo" => self.memo = value.to_string(),
            _ => return Err(invalid()),
        }
        Ok(())
    }
}

/// Snapshot of an entry accepted by [`JournalEntry::post`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostedEntry {
    pub header: EntryHeader,
    pub lines: Vec<JournalLine>,
    /// Common total of debits and credits
    pub total: Decimal,
    pub posted_at: DateTime<Utc>,
}

/// An entry being composed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub header: EntryHeader,
    lines: Vec<JournalLine>,
    next_id: u64,
}

impl Default for JournalEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalEntry {
    /// Blank entry with the minimum two lines
    pub fn new() -> Self {
        let mut entry = Self {
            header: EntryHeader::default(),
            lines: Vec::with_capacity(MIN_LINES),
            next_id: 1,
        };
        for _ in 0..MIN_LINES {
            entry.add_line();
        }
        entry
    }

    pub fn lines(&self) -> &[JournalLine] {
        &self.lines
    }

    pub fn set_header(&mut self, header: EntryHeader) {
        self.header = header;
    }

    pub fn line(&self, id: u64) -> Option<&JournalLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Whether a line may be removed right now
    pub fn can_remove_line(&self) -> bool {
        self.lines.len() > MIN_LINES
    }

    /// Append a blank line and return its id
    pub fn add_line(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.lines.push(JournalLine::blank(id));
        id
    }

    /// Remove a line, keeping at least [`MIN_LINES`]
    pub fn remove_line(&mut self, id: u64) -> CoreResult<()> {
        let index = self
            .lines
            .iter()
            .position(|l| l.id == id)
            .ok_or(CoreError::LineNotFound { id })?;
        if !self.can_remove_line() {
            return Err(CoreError::LineFloor { minimum: MIN_LINES });
        }
        self.lines.remove(index);
        Ok(())
    }

    /// Replace one field of one line.
    ///
    /// An amount can only be entered on a side whose opposite is empty, so a
    /// line never carries both a debit and a credit. An empty value clears
    /// the amount.
    pub fn update_line(&mut self, id: u64, field: LineField, value: &str) -> CoreResult<()> {
        let index = self
            .lines
            .iter()
            .position(|l| l.id == id)
            .ok_or(CoreError::LineNotFound { id })?;
        let previous = self.lines[index].clone();
        let line = &mut self.lines[index];

        match field {
            LineField::Account => line.account_code = value.trim().to_string(),
            LineField::Description => line.description = value.to_string(),
            LineField::Debit => {
                let amount = parse_amount(value)?;
                if amount.is_some() && line.credit.is_some() {
                    return Err(CoreError::AmountConflict {
                        id,
                        existing: LineField::Credit.to_string(),
                    });
                }
                line.debit = amount;
            }
            LineField::Credit => {
                let amount = parse_amount(value)?;
                if amount.is_some() && line.debit.is_some() {
                    return Err(CoreError::AmountConflict {
                        id,
                        existing: LineField::Debit.to_string(),
                    });
                }
                line.credit = amount;
            }
        }

        let debit = checked_total(self.lines.iter().map(JournalLine::debit_amount));
        let credit = checked_total(self.lines.iter().map(JournalLine::credit_amount));
        if debit.is_none() || credit.is_none() {
            self.lines[index] = previous;
            return Err(CoreError::InvalidAmount {
                value: value.trim().to_string(),
            });
        }
        Ok(())
    }

    /// Sum of debits; `update_line` keeps it within range
    pub fn total_debit(&self) -> Decimal {
        checked_total(self.lines.iter().map(JournalLine::debit_amount)).unwrap_or(Decimal::MAX)
    }

    pub fn total_credit(&self) -> Decimal {
        checked_total(self.lines.iter().map(JournalLine::credit_amount)).unwrap_or(Decimal::MAX)
    }

    /// Debits equal credits and the entry moves some money
    pub fn is_balanced(&self) -> bool {
        let debit = self.total_debit();
        debit == self.total_credit() && debit > Decimal::ZERO
    }

    /// Absolute gap between the two sides
    pub fn difference(&self) -> Decimal {
        (self.total_debit() - self.total_credit()).abs()
    }

    /// Freeze a balanced entry
    pub fn post(&self) -> CoreResult<PostedEntry> {
        if !self.is_balanced() {
            return Err(CoreError::Unbalanced {
                debit: self.total_debit(),
                credit: self.total_credit(),
            });
        }
        Ok(PostedEntry {
            header: self.header.clone(),
            lines: self.lines.clone(),
            total: self.total_debit(),
            posted_at: Utc::now(),
        })
    }

    /// Drop everything and start over with two blank lines
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Sum amounts, `None` on overflow
fn checked_total(amounts: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    amounts.fold(Some(Decimal::ZERO), |total, amount| total?.checked_add(amount))
}

/// Parse user input into an amount.
///
/// Blank input means "no amount". Anything else must be a non-negative
/// decimal with at most [`AMOUNT_SCALE`] fractional digits and no larger
/// than [`MAX_AMOUNT`].
pub fn parse_amount(value: &str) -> CoreResult<Option<Decimal>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let invalid = || CoreError::InvalidAmount { value: trimmed.to_string() };
    let amount = Decimal::from_str(trimmed).map_err(|_| invalid())?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid());
    }
    if amount.normalize().scale() > AMOUNT_SCALE || amount > MAX_AMOUNT {
        return Err(invalid());
    }
    Ok(Some(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn entry_with(debit: &str, credit: &str) -> JournalEntry {
        let mut entry = JournalEntry::new();
        let ids: Vec<u64> = entry.lines().iter().map(|l| l.id).collect();
        entry.update_line(ids[0], LineField::Debit, debit).unwrap();
        entry.update_line(ids[1], LineField::Credit, credit).unwrap();
        entry
    }

    #[test]
    fn test_new_entry_has_two_blank_lines() {
        let entry = JournalEntry::new();
        assert_eq!(entry.lines().len(), 2);
        assert!(entry.lines().iter().all(|l| l.debit.is_none() && l.credit.is_none()));
        assert_ne!(entry.lines()[0].id, entry.lines()[1].id);
        assert!(!entry.is_balanced());
    }

    #[test]
    fn test_balanced_entry() {
        let entry = entry_with("100", "100");
        assert_eq!(entry.total_debit(), dec("100"));
        assert_eq!(entry.total_credit(), dec("100"));
        assert!(entry.is_balanced());
        assert_eq!(entry.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_off_by_a_cent() {
        let entry = entry_with("100", "99.99");
        assert!(!entry.is_balanced());
        assert_eq!(entry.difference(), dec("0.01"));
    }

    #[test]
    fn test_zero_entry_is_not_balanced() {
        let entry = entry_with("0", "0");
        assert_eq!(entry.total_debit(), entry.total_credit());
        assert!(!entry.is_balanced());

        let blank = JournalEntry::new();
        assert!(!blank.is_balanced());
        assert!(matches!(blank.post(), Err(CoreError::Unbalanced { .. })));
    }

    #[test]
    fn test_decimal_sums_are_exact() {
        let mut entry = entry_with("0.1", "0.3");
        let third = entry.add_line();
        entry.update_line(third, LineField::Debit, "0.2").unwrap();
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_totals_are_pure() {
        let entry = entry_with("250.50", "250.50");
        assert_eq!(entry.total_debit(), entry.total_debit());
        assert_eq!(entry.total_credit(), entry.total_credit());
        assert_eq!(entry.is_balanced(), entry.is_balanced());
    }

    #[test]
    fn test_debit_blocks_credit_and_vice_versa() {
        let mut entry = JournalEntry::new();
        let id = entry.lines()[0].id;
        entry.update_line(id, LineField::Credit, "40").unwrap();

        let err = entry.update_line(id, LineField::Debit, "40").unwrap_err();
        assert!(matches!(err, CoreError::AmountConflict { .. }));
        let line = entry.line(id).unwrap();
        assert_eq!(line.debit, None);
        assert_eq!(line.credit, Some(dec("40")));

        // clearing the credit frees the debit side
        entry.update_line(id, LineField::Credit, "").unwrap();
        entry.update_line(id, LineField::Debit, "40").unwrap();
        let err = entry.update_line(id, LineField::Credit, "1").unwrap_err();
        assert!(matches!(err, CoreError::AmountConflict { .. }));

        // blank input on the blocked side is always accepted
        entry.update_line(id, LineField::Credit, " ").unwrap();

        assert!(entry
            .lines()
            .iter()
            .all(|l| !(l.debit.is_some() && l.credit.is_some())));
    }

    #[test]
    fn test_floor_of_two_lines() {
        let mut entry = JournalEntry::new();
        let first = entry.lines()[0].id;
        let second = entry.lines()[1].id;

        assert_eq!(entry.remove_line(first), Err(CoreError::LineFloor { minimum: 2 }));
        assert_eq!(entry.remove_line(second), Err(CoreError::LineFloor { minimum: 2 }));
        assert_eq!(entry.lines().len(), 2);

        let third = entry.add_line();
        assert_eq!(entry.lines().len(), 3);
        entry.remove_line(first).unwrap();
        assert_eq!(entry.lines().len(), 2);
        assert!(entry.line(third).is_some());
    }

    #[test]
    fn test_line_ids_stay_unique() {
        let mut entry = JournalEntry::new();
        let a = entry.add_line();
        entry.remove_line(a).unwrap();
        let b = entry.add_line();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unknown_line() {
        let mut entry = JournalEntry::new();
        assert_eq!(entry.remove_line(99), Err(CoreError::LineNotFound { id: 99 }));
        assert_eq!(
            entry.update_line(99, LineField::Description, "x"),
            Err(CoreError::LineNotFound { id: 99 })
        );
    }

    #[test]
    fn test_text_fields() {
        let mut entry = JournalEntry::new();
        let id = entry.lines()[1].id;
        entry.update_line(id, LineField::Account, " 5200 ").unwrap();
        entry.update_line(id, LineField::Description, "Fuel top-up").unwrap();
        let line = entry.line(id).unwrap();
        assert_eq!(line.account_code, "5200");
        assert_eq!(line.description, "Fuel top-up");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("").unwrap(), None);
        assert_eq!(parse_amount("  ").unwrap(), None);
        assert_eq!(parse_amount("12").unwrap(), Some(dec("12")));
        assert_eq!(parse_amount(" 99.99 ").unwrap(), Some(dec("99.99")));
        assert_eq!(parse_amount("1.50").unwrap(), Some(dec("1.50")));
        assert_eq!(parse_amount("2.500").unwrap(), Some(dec("2.500")));
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("0.001").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_amount_ceiling() {
        assert_eq!(parse_amount("1000000000000000").unwrap(), Some(MAX_AMOUNT));
        assert!(parse_amount("1000000000000000.01").is_err());
        assert!(parse_amount("79228162514264337593543950335").is_err());

        let mut entry = JournalEntry::new();
        let ids: Vec<u64> = entry.lines().iter().map(|l| l.id).collect();
        for id in &ids {
            entry.update_line(*id, LineField::Debit, "1000000000000000").unwrap();
            assert!(matches!(
                entry.update_line(*id, LineField::Debit, "1000000000000001"),
                Err(CoreError::InvalidAmount { .. })
            ));
        }
        assert_eq!(entry.total_debit(), dec("2000000000000000"));
    }

    #[test]
    fn test_total_overflow_is_rejected() {
        let mut entry = JournalEntry::new();
        let ids: Vec<u64> = entry.lines().iter().map(|l| l.id).collect();
        entry.lines[0].debit = Some(Decimal::MAX);

        let result = entry.update_line(ids[1], LineField::Debit, "1");
        assert!(matches!(result, Err(CoreError::InvalidAmount { .. })));
        assert_eq!(entry.line(ids[1]).unwrap().debit, None);
        assert_eq!(entry.total_debit(), Decimal::MAX);
        assert!(checked_total([Decimal::MAX, Decimal::ONE].into_iter()).is_none());
    }

    #[test]
    fn test_invalid_amount_leaves_line_untouched() {
        let mut entry = JournalEntry::new();
        let id = entry.lines()[0].id;
        entry.update_line(id, LineField::Debit, "10").unwrap();
        assert!(entry.update_line(id, LineField::Debit, "ten").is_err());
        assert_eq!(entry.line(id).unwrap().debit, Some(dec("10")));
    }

    #[test]
    fn test_post_and_reset() {
        let mut entry = entry_with("1500", "1500");
        entry.set_header(EntryHeader {
            reference: "JE-2024-001".to_string(),
            entry_type: Some(EntryType::General),
            ..entry.header.clone()
        });

        let posted = entry.post().unwrap();
        assert_eq!(posted.total, dec("1500"));
        assert_eq!(posted.lines.len(), 2);
        assert_eq!(posted.header.reference, "JE-2024-001");

        entry.reset();
        assert_eq!(entry.lines().len(), 2);
        assert!(entry.header.reference.is_empty());
        assert_eq!(entry.total_debit(), Decimal::ZERO);
    }

    #[test]
    fn test_header_fields() {
        let mut header = EntryHeader::default();
        header.set_field("date", "2024-03-15").unwrap();
        header.set_field("reference", " JE-7 ").unwrap();
        header.set_field("entry_type", "adjustment").unwrap();
        assert_eq!(header.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(header.reference, "JE-7");
        assert_eq!(header.entry_type, Some(EntryType::Adjustment));

        header.set_field("entry_type", "").unwrap();
        assert_eq!(header.entry_type, None);

        let before = header.clone();
        assert!(matches!(
            header.set_field("date", "15/03/2024"),
            Err(CoreError::InvalidValue { .. })
        ));
        assert!(header.set_field("entry_type", "payroll").is_err());
        assert!(header.set_field("colour", "red").is_err());
        assert_eq!(header, before);
    }
}
