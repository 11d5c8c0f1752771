//! Contributor bookkeeping.
//!
//! [`Books`] holds the per-funder balance map and the append-only funder
//! list. The map is authoritative for amounts; the list records
//! contribution order and may repeat a funder.
//!
//! Both clearing routines leave the books empty. They differ only in how
//! many persistent reads they perform, which they report as a
//! [`StorageCost`].

use std::collections::HashMap;

use fundme_types::{Address, FundMeError, Result, StorageCost, Wei};

/// Balance map plus funder list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Books {
    balances: HashMap<Address, Wei>,
    funders: Vec<Address>,
}

impl Books {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount credited to `funder` and not yet withdrawn. Zero if absent.
    #[must_use]
    pub fn funded_amount(&self, funder: Address) -> Wei {
        self.balances.get(&funder).copied().unwrap_or_default()
    }

    /// Funder at position `index` in contribution order.
    ///
    /// # Errors
    /// Returns [`FundMeError::IndexOutOfRange`] if `index >= funder_count()`.
    pub fn funder_at(&self, index: usize) -> Result<Address> {
        self.funders
            .get(index)
            .copied()
            .ok_or(FundMeError::IndexOutOfRange {
                index,
                len: self.funders.len(),
            })
    }

    /// Length of the funder list, duplicates included.
    #[must_use]
    pub fn funder_count(&self) -> usize {
        self.funders.len()
    }

    /// Number of distinct funders with a balance.
    #[must_use]
    pub fn contributor_count(&self) -> usize {
        self.balances.len()
    }

    #[must_use]
    pub fn funders(&self) -> &[Address] {
        &self.funders
    }

    /// Sum of all balances, `None` on overflow.
    #[must_use]
    pub fn total(&self) -> Option<Wei> {
        Wei::checked_sum(self.balances.values().copied())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty() && self.funders.is_empty()
    }

    /// Add `amount` to `funder`'s balance and append them to the list.
    ///
    /// The new balance is computed before anything is written, so an
    /// overflow leaves the books untouched.
    ///
    /// # Errors
    /// Returns [`FundMeError::ArithmeticOverflow`] if the balance would
    /// exceed `u128::MAX`.
    pub fn credit(&mut self, funder: Address, amount: Wei) -> Result<Wei> {
        let updated = self
            .funded_amount(funder)
            .checked_add(amount)
            .ok_or(FundMeError::ArithmeticOverflow)?;
        self.balances.insert(funder, updated);
        self.funders.push(funder);
        Ok(updated)
    }

    /// Clear by indexing into the persistent list on every iteration.
    ///
    /// Each step reads the list length and the element; the loop exit reads
    /// the length once more.
    pub(crate) fn clear_straightforward(&mut self) -> StorageCost {
        let mut cost = StorageCost::default();
        let mut index = 0;
        loop {
            cost.reads += 1;
            if index >= self.funders.len() {
                break;
            }
            cost.reads += 1;
            let funder = self.funders[index];
            self.balances.remove(&funder);
            cost.writes += 1;
            index += 1;
        }
        self.funders.clear();
        cost.writes += 1;
        cost
    }

    /// Clear by copying the list once into a fixed-size working view.
    pub(crate) fn clear_optimized(&mut self) -> StorageCost {
        let mut cost = StorageCost::default();
        let working: Box<[Address]> = self.funders.as_slice().into();
        cost.reads += 1 + u64::try_from(working.len()).unwrap_or(u64::MAX);
        for funder in working.iter() {
            self.balances.remove(funder);
            cost.writes += 1;
        }
        self.funders = Vec::new();
        cost.writes += 1;
        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books_with(funders: &[(u64, u128)]) -> Books {
        let mut books = Books::new();
        for (seed, wei) in funders {
            books.credit(Address::from_seed(*seed), Wei(*wei)).unwrap();
        }
        books
    }

    #[test]
    fn absent_funder_is_zero() {
        let books = Books::new();
        assert_eq!(books.funded_amount(Address::from_seed(1)), Wei::ZERO);
        assert!(books.is_empty());
    }

    #[test]
    fn credit_accumulates_and_appends() {
        let books = books_with(&[(1, 10), (2, 5), (1, 7)]);
        assert_eq!(books.funded_amount(Address::from_seed(1)), Wei(17));
        assert_eq!(books.funded_amount(Address::from_seed(2)), Wei(5));
        assert_eq!(books.funder_count(), 3);
        assert_eq!(books.contributor_count(), 2);
        assert_eq!(books.funder_at(2).unwrap(), Address::from_seed(1));
        assert_eq!(books.total(), Some(Wei(22)));
    }

    #[test]
    fn funder_at_out_of_range() {
        let books = books_with(&[(1, 10)]);
        let err = books.funder_at(1).unwrap_err();
        assert!(matches!(
            err,
            FundMeError::IndexOutOfRange { index: 1, len: 1 }
        ));
    }

    #[test]
    fn credit_overflow_leaves_books_unchanged() {
        let mut books = books_with(&[(1, u128::MAX)]);
        let before = books.clone();
        let err = books.credit(Address::from_seed(1), Wei(1)).unwrap_err();
        assert!(matches!(err, FundMeError::ArithmeticOverflow));
        assert_eq!(books, before);
    }

    #[test]
    fn straightforward_clear_empties_books() {
        let mut books = books_with(&[(1, 10), (2, 5), (1, 7)]);
        let cost = books.clear_straightforward();
        assert!(books.is_empty());
        assert_eq!(cost, StorageCost { reads: 7, writes: 4 });
    }

    #[test]
    fn optimized_clear_empties_books() {
        let mut books = books_with(&[(1, 10), (2, 5), (1, 7)]);
        let cost = books.clear_optimized();
        assert!(books.is_empty());
        assert_eq!(cost, StorageCost { reads: 4, writes: 4 });
    }

    #[test]
    fn clears_agree_on_end_state() {
        let mut a = books_with(&[(1, 10), (2, 5), (3, 1), (2, 2)]);
        let mut b = a.clone();
        let cost_a = a.clear_straightforward();
        let cost_b = b.clear_optimized();
        assert_eq!(a, b);
        assert!(cost_b.reads < cost_a.reads);
        assert_eq!(cost_a.writes, cost_b.writes);
    }

    #[test]
    fn clearing_empty_books_is_cheap() {
        let mut books = Books::new();
        assert_eq!(
            books.clear_straightforward(),
            StorageCost { reads: 1, writes: 1 }
        );
        assert_eq!(books.clear_optimized(), StorageCost { reads: 1, writes: 1 });
    }
}
