//! Entity and transaction identifiers

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use rand::Rng;

use crate::proto;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MILLISECOND: i64 = 1_000_000;

/// Subtracted from the wall clock when generating a valid start so that
/// small clock drift between client and node does not reject the transaction.
const VALID_START_DRIFT_NANOS: i64 = 10 * NANOS_PER_SECOND;

/// Minimum step between two generated valid starts.
const VALID_START_INCREMENT_NANOS: i64 = 1_000;

static LAST_VALID_START: AtomicI64 = AtomicI64::new(0);

/// Error returned when parsing an identifier fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityIdError {
    #[error("invalid entity id `{0}`, expected `shard.realm.num`")]
    Malformed(String),

    #[error("invalid transaction id `{0}`, expected `shard.realm.num@seconds.nanos`")]
    MalformedTransactionId(String),

    #[error("missing field `{0}` in protobuf message")]
    MissingField(&'static str),
}

fn parse_triple(value: &str) -> Result<(u64, u64, u64), EntityIdError> {
    let malformed = || EntityIdError::Malformed(value.to_string());
    let mut parts = value.split('.');
    let mut next = || -> Result<u64, EntityIdError> {
        parts
            .next()
            .ok_or_else(malformed)?
            .trim()
            .parse::<u64>()
            .map_err(|_| malformed())
    };
    let triple = (next()?, next()?, next()?);
    if parts.next().is_some() {
        return Err(malformed());
    }
    Ok(triple)
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $proto:ident, $num_field:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name {
            pub shard: u64,
            pub realm: u64,
            pub num: u64,
        }

        impl $name {
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }

            pub fn to_proto(&self) -> proto::$proto {
                proto::$proto {
                    shard_num: self.shard as i64,
                    realm_num: self.realm as i64,
                    $num_field: self.num as i64,
                }
            }

            pub fn from_proto(value: &proto::$proto) -> Self {
                Self {
                    shard: value.shard_num as u64,
                    realm: value.realm_num as u64,
                    num: value.$num_field as u64,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl FromStr for $name {
            type Err = EntityIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (shard, realm, num) = parse_triple(s)?;
                Ok(Self { shard, realm, num })
            }
        }

        impl From<u64> for $name {
            fn from(num: u64) -> Self {
                Self::new(0, 0, num)
            }
        }
    };
}

entity_id!(
    /// Account identifier; also the identity of a consensus node.
    AccountId,
    AccountId,
    account_num
);

entity_id!(
    /// File identifier
    FileId,
    FileId,
    file_num
);

entity_id!(
    /// Topic identifier
    TopicId,
    TopicId,
    topic_num
);

/// Point in time with nanosecond precision, as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn from_nanos(total: i64) -> Self {
        Self {
            seconds: total.div_euclid(NANOS_PER_SECOND),
            nanos: total.rem_euclid(NANOS_PER_SECOND) as i32,
        }
    }

    pub fn now() -> Self {
        Self::from_nanos(chrono::Utc::now().timestamp_millis() * NANOS_PER_MILLISECOND)
    }

    pub fn as_nanos(&self) -> i64 {
        self.seconds * NANOS_PER_SECOND + self.nanos as i64
    }

    /// Returns this timestamp shifted by `nanos` nanoseconds.
    pub fn plus_nanos(&self, nanos: i64) -> Self {
        Self::from_nanos(self.as_nanos() + nanos)
    }

    pub fn to_proto(&self) -> proto::Timestamp {
        proto::Timestamp {
            seconds: self.seconds,
            nanos: self.nanos,
        }
    }

    pub fn from_proto(value: &proto::Timestamp) -> Self {
        Self::from_nanos(value.seconds * NANOS_PER_SECOND + value.nanos as i64)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

/// Identity of one submission: the paying account plus the valid start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start: Timestamp,
    pub scheduled: bool,
}

impl TransactionId {
    pub fn with_valid_start(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self {
            account_id,
            valid_start,
            scheduled: false,
        }
    }

    /// Generates a fresh transaction id for `account_id`.
    ///
    /// Valid starts are strictly increasing within the process even when the
    /// wall clock stalls or moves backwards.
    pub fn generate(account_id: AccountId) -> Self {
        let now = chrono::Utc::now().timestamp_millis() * NANOS_PER_MILLISECOND
            - VALID_START_DRIFT_NANOS;

        let mut last = LAST_VALID_START.load(Ordering::Acquire);
        let current = loop {
            let candidate = if now <= last {
                last + VALID_START_INCREMENT_NANOS
            } else {
                now
            };
            match LAST_VALID_START.compare_exchange(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break candidate,
                Err(actual) => last = actual,
            }
        };

        let jitter = rand::rng().random_range(0..VALID_START_INCREMENT_NANOS);
        Self::with_valid_start(account_id, Timestamp::from_nanos(current + jitter))
    }

    /// Returns the id whose valid start is `offset` nanoseconds later.
    ///
    /// Chunked submissions derive one id per chunk this way.
    pub fn with_offset(&self, offset: i64) -> Self {
        Self {
            valid_start: self.valid_start.plus_nanos(offset),
            ..*self
        }
    }

    pub fn to_proto(&self) -> proto::TransactionId {
        proto::TransactionId {
            transaction_valid_start: Some(self.valid_start.to_proto()),
            account_id: Some(self.account_id.to_proto()),
            scheduled: self.scheduled,
            nonce: 0,
        }
    }

    pub fn from_proto(value: &proto::TransactionId) -> Result<Self, EntityIdError> {
        let account_id = value
            .account_id
            .as_ref()
            .ok_or(EntityIdError::MissingField("account_id"))?;
        let valid_start = value
            .transaction_valid_start
            .as_ref()
            .ok_or(EntityIdError::MissingField("transaction_valid_start"))?;
        Ok(Self {
            account_id: AccountId::from_proto(account_id),
            valid_start: Timestamp::from_proto(valid_start),
            scheduled: value.scheduled,
        })
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account_id, self.valid_start)?;
        if self.scheduled {
            f.write_str("?scheduled")?;
        }
        Ok(())
    }
}

impl FromStr for TransactionId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EntityIdError::MalformedTransactionId(s.to_string());
        let (body, scheduled) = match s.strip_suffix("?scheduled") {
            Some(body) => (body, true),
            None => (s, false),
        };
        let (account, start) = body.split_once('@').ok_or_else(malformed)?;
        let (seconds, nanos) = start.split_once('.').ok_or_else(malformed)?;
        let seconds = seconds.parse::<i64>().map_err(|_| malformed())?;
        let nanos = nanos.parse::<i32>().map_err(|_| malformed())?;
        if !(0..NANOS_PER_SECOND as i32).contains(&nanos) {
            return Err(malformed());
        }
        Ok(Self {
            account_id: account.parse().map_err(|_| malformed())?,
            valid_start: Timestamp { seconds, nanos },
            scheduled,
        })
    }
}
