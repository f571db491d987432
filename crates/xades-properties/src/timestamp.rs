#![forbid(unsafe_code)]

//! Time-stamp property values.
//!
//! A time-stamp is declared before its token exists: only the
//! canonicalization used for its digest input is known. Once the token has
//! been obtained (signing) or checked (verification) the pending value is
//! converted, once, into a resolved value carrying the token, its time and
//! the TSA's validation data.

use base64::Engine;
use std::cell::{Ref, RefCell};
use std::sync::Arc;
use xades_core::{Algorithm, Error, PropertyKind, Timestamp};
use xades_validation::{TimeStampVerificationData, ValidationData};

/// A declared time-stamp whose token is not yet known.
#[derive(Debug, Clone)]
pub struct PendingTimeStamp {
    c14n: Arc<Algorithm>,
}

impl PendingTimeStamp {
    pub fn new(c14n: Arc<Algorithm>) -> Self {
        Self { c14n }
    }

    pub fn c14n(&self) -> &Arc<Algorithm> {
        &self.c14n
    }

    /// Complete the time-stamp with its encoded token and verification data.
    pub fn resolve(
        self,
        encoded_token: Vec<u8>,
        data: TimeStampVerificationData,
    ) -> ResolvedTimeStamp {
        let (validation_data, time) = data.into_parts();
        ResolvedTimeStamp {
            c14n: self.c14n,
            encoded_token,
            time,
            validation_data,
        }
    }
}

/// A time-stamp whose token has been obtained and checked.
#[derive(Debug, Clone)]
pub struct ResolvedTimeStamp {
    c14n: Arc<Algorithm>,
    encoded_token: Vec<u8>,
    time: Timestamp,
    validation_data: ValidationData,
}

impl ResolvedTimeStamp {
    pub fn c14n(&self) -> &Arc<Algorithm> {
        &self.c14n
    }

    pub fn encoded_token(&self) -> &[u8] {
        &self.encoded_token
    }

    /// Token as `EncapsulatedTimeStamp` text.
    pub fn encoded_token_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.encoded_token)
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }

    pub fn validation_data(&self) -> &ValidationData {
        &self.validation_data
    }
}

#[derive(Debug)]
enum State {
    Pending(PendingTimeStamp),
    Resolved(ResolvedTimeStamp),
}

/// Payload of every time-stamp property.
///
/// The property is shared (a data-object time-stamp may cover several
/// descriptions), so the pending-to-resolved step happens in place.
#[derive(Debug)]
pub struct TimeStampProperty {
    kind: PropertyKind,
    state: RefCell<State>,
}

impl TimeStampProperty {
    pub(crate) fn new(kind: PropertyKind, pending: PendingTimeStamp) -> Self {
        debug_assert!(kind.is_time_stamp());
        Self {
            kind,
            state: RefCell::new(State::Pending(pending)),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn c14n(&self) -> Arc<Algorithm> {
        match &*self.state.borrow() {
            State::Pending(p) => p.c14n.clone(),
            State::Resolved(r) => r.c14n.clone(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(&*self.state.borrow(), State::Resolved(_))
    }

    pub fn resolved(&self) -> Option<Ref<'_, ResolvedTimeStamp>> {
        Ref::filter_map(self.state.borrow(), |s| match s {
            State::Resolved(r) => Some(r),
            State::Pending(_) => None,
        })
        .ok()
    }

    /// Convert the pending value. Fails if this property was resolved
    /// before; the earlier resolution is kept.
    pub fn resolve(&self, encoded_token: Vec<u8>, data: TimeStampVerificationData) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        let pending = match &*state {
            State::Pending(p) => p.clone(),
            State::Resolved(_) => return Err(Error::TimeStampAlreadyResolved(self.kind)),
        };
        *state = State::Resolved(pending.resolve(encoded_token, data));
        tracing::debug!(kind = %self.kind, "time-stamp resolved");
        Ok(())
    }
}
