//! Thread-safe handle to a [`Ledger`].
//!
//! Every operation takes the lock for its whole duration, so calls are
//! linearizable: a contribution either lands entirely before or entirely
//! after a concurrent withdrawal, and a transfer sink never runs while
//! another caller can observe the ledger.
//!
//! The lock is not reentrant. The thread holding it is recorded, and a
//! call from that same thread (a sink calling back in during payout)
//! fails with [`FundMeError::ReentrantCall`] instead of deadlocking.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use fundme_types::{Address, Contribution, FundMeError, Result, WithdrawalReceipt, Wei};
use parking_lot::{Mutex, MutexGuard};

use crate::ledger::Ledger;
use crate::oracle::PriceSource;
use crate::transfer::ValueSink;

#[derive(Debug)]
struct Inner<P> {
    ledger: Mutex<Ledger<P>>,
    holder: Mutex<Option<ThreadId>>,
}

/// Cloneable, lock-protected ledger.
#[derive(Debug)]
pub struct SharedLedger<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for SharedLedger<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Locked ledger; clears the holder mark before the lock is released.
struct Held<'a, P> {
    ledger: MutexGuard<'a, Ledger<P>>,
    holder: &'a Mutex<Option<ThreadId>>,
}

impl<P> Deref for Held<'_, P> {
    type Target = Ledger<P>;

    fn deref(&self) -> &Ledger<P> {
        &self.ledger
    }
}

impl<P> DerefMut for Held<'_, P> {
    fn deref_mut(&mut self) -> &mut Ledger<P> {
        &mut self.ledger
    }
}

impl<P> Drop for Held<'_, P> {
    fn drop(&mut self) {
        *self.holder.lock() = None;
    }
}

impl<P: PriceSource> SharedLedger<P> {
    #[must_use]
    pub fn new(ledger: Ledger<P>) -> Self {
        Self {
            inner: Arc::new(Inner {
                ledger: Mutex::new(ledger),
                holder: Mutex::new(None),
            }),
        }
    }

    fn enter(&self) -> Result<Held<'_, P>> {
        let me = thread::current().id();
        if *self.inner.holder.lock() == Some(me) {
            tracing::warn!("Re-entrant call into a locked ledger rejected");
            return Err(FundMeError::ReentrantCall);
        }
        let ledger = self.inner.ledger.lock();
        *self.inner.holder.lock() = Some(me);
        Ok(Held {
            ledger,
            holder: &self.inner.holder,
        })
    }

    /// See [`Ledger::contribute`].
    pub fn contribute(&self, caller: Address, amount: Wei) -> Result<Contribution> {
        self.enter()?.contribute(caller, amount)
    }

    /// See [`Ledger::withdraw`].
    pub fn withdraw<S: ValueSink>(
        &self,
        caller: Address,
        sink: &mut S,
    ) -> Result<WithdrawalReceipt> {
        self.enter()?.withdraw(caller, sink)
    }

    /// See [`Ledger::withdraw_optimized`].
    pub fn withdraw_optimized<S: ValueSink>(
        &self,
        caller: Address,
        sink: &mut S,
    ) -> Result<WithdrawalReceipt> {
        self.enter()?.withdraw_optimized(caller, sink)
    }

    pub fn funded_amount(&self, funder: Address) -> Result<Wei> {
        Ok(self.enter()?.funded_amount(funder))
    }

    pub fn funder_at(&self, index: usize) -> Result<Address> {
        self.enter()?.funder_at(index)
    }

    pub fn funder_count(&self) -> Result<usize> {
        Ok(self.enter()?.funder_count())
    }

    pub fn owner(&self) -> Result<Address> {
        Ok(self.enter()?.owner())
    }

    pub fn price_oracle_address(&self) -> Result<Address> {
        Ok(self.enter()?.price_oracle_address())
    }

    pub fn custodied_balance(&self) -> Result<Wei> {
        Ok(self.enter()?.custodied_balance())
    }

    pub fn minimum_usd(&self) -> Result<Wei> {
        Ok(self.enter()?.minimum_usd())
    }

    pub fn verify_custody(&self) -> Result<()> {
        self.enter()?.verify_custody()
    }

    /// Run `f` against the ledger under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&Ledger<P>) -> R) -> Result<R> {
        Ok(f(&*self.enter()?))
    }
}
