//! # Scan Input State Machine
//!
//! Consumes the raw keystroke stream (a barcode scanner is just a very fast
//! keyboard), buffers digits, detects the Enter terminator, and dispatches
//! completed codes to the lookup flow — while enforcing the rule that no new
//! scan may proceed while an unresolved one is pending.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │              digit                    digit (re-arms deadline)          │
//! │   ┌──────┐ ───────► ┌───────────┐ ──────┐                              │
//! │   │ Idle │          │ Buffering │ ◄─────┘                              │
//! │   └──────┘ ◄─────── └───────────┘                                      │
//! │      ▲      deadline      │                                             │
//! │      │      elapsed       │ Enter                                       │
//! │      │      (discard,     ▼                                             │
//! │      │       benign)   dispatch(code) ──► lookup                        │
//! │      │                    │                                             │
//! │      │                    │ miss, no similar candidate                  │
//! │      │                    ▼                                             │
//! │      │                ┌─────────┐   digit/Enter: REJECTED with a       │
//! │      └─── resolved ── │ Blocked │   visible alert, input discarded,    │
//! │        (add/manual/   └─────────┘   never queued                       │
//! │         cancel)                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The inactivity deadline is an explicit value owned by the machine; a new
//! digit replaces it synchronously, so a stale expiry can never fire late
//! and eat a fresh buffer.

use std::time::{Duration, Instant};

use crate::types::Product;

/// Inactivity window after which a partial buffer is treated as noise.
/// Scanners emit a full code in well under this; a human typing at the
/// keyboard will blow past it between keys, which is the point.
pub const SCAN_BUFFER_TIMEOUT: Duration = Duration::from_millis(200);

// =============================================================================
// Pending Scans
// =============================================================================

/// An unresolved scan awaiting operator action. While one exists, all
/// further scan input is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingScan {
    /// Code matched nothing, not even approximately. The operator must add
    /// the product, sell it as a manual item, or cancel.
    NotFound { upc: String },
    /// Code missed, but a similar catalog UPC was found; "did you mean
    /// this?" is on screen.
    Similar {
        scanned: String,
        candidate_upc: String,
    },
}

impl PendingScan {
    /// The scanned code the pending state is about.
    pub fn scanned_upc(&self) -> &str {
        match self {
            PendingScan::NotFound { upc } => upc,
            PendingScan::Similar { scanned, .. } => scanned,
        }
    }
}

// =============================================================================
// Machine
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    Idle,
    Buffering { buffer: String, deadline: Instant },
    Blocked { pending: PendingScan },
}

/// Outcome of feeding one keystroke to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Digit absorbed into the buffer.
    Buffered,
    /// Enter completed a code; dispatch it to lookup.
    Dispatch(String),
    /// Scan activity arrived while a pending scan is unresolved; show the
    /// transient alert, input discarded.
    RejectedWhileBlocked,
    /// Key is not part of the scan protocol.
    Ignored,
}

/// The scan input state machine.
#[derive(Debug, Clone)]
pub struct ScanMachine {
    state: ScanState,
    timeout: Duration,
}

impl Default for ScanMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanMachine {
    /// Creates an idle machine with the standard inactivity window.
    pub fn new() -> Self {
        ScanMachine {
            state: ScanState::Idle,
            timeout: SCAN_BUFFER_TIMEOUT,
        }
    }

    /// Creates a machine with a custom inactivity window (tests).
    pub fn with_timeout(timeout: Duration) -> Self {
        ScanMachine {
            state: ScanState::Idle,
            timeout,
        }
    }

    /// Feeds one keystroke. `'\n'` is the Enter terminator.
    pub fn on_key(&mut self, ch: char, now: Instant) -> KeyOutcome {
        match &mut self.state {
            ScanState::Blocked { .. } => {
                if ch.is_ascii_digit() || ch == '\n' {
                    KeyOutcome::RejectedWhileBlocked
                } else {
                    KeyOutcome::Ignored
                }
            }
            ScanState::Idle => {
                if ch.is_ascii_digit() {
                    self.state = ScanState::Buffering {
                        buffer: ch.to_string(),
                        deadline: now + self.timeout,
                    };
                    KeyOutcome::Buffered
                } else {
                    KeyOutcome::Ignored
                }
            }
            ScanState::Buffering { buffer, deadline } => {
                if ch.is_ascii_digit() {
                    buffer.push(ch);
                    *deadline = now + self.timeout;
                    KeyOutcome::Buffered
                } else if ch == '\n' {
                    let code = std::mem::take(buffer);
                    self.state = ScanState::Idle;
                    KeyOutcome::Dispatch(code)
                } else {
                    KeyOutcome::Ignored
                }
            }
        }
    }

    /// Discards a buffer whose inactivity deadline has passed. Returns true
    /// if a partial buffer was dropped. Not an error, just idle-buffer
    /// expiry.
    pub fn expire_stale(&mut self, now: Instant) -> bool {
        if let ScanState::Buffering { deadline, .. } = &self.state {
            if now >= *deadline {
                self.state = ScanState::Idle;
                return true;
            }
        }
        false
    }

    /// The active inactivity deadline, if buffering.
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            ScanState::Buffering { deadline, .. } => Some(*deadline),
            _ => None,
        }
    }

    /// Enters the blocked state for a code with no match at all.
    pub fn block_not_found(&mut self, upc: impl Into<String>) {
        self.state = ScanState::Blocked {
            pending: PendingScan::NotFound { upc: upc.into() },
        };
    }

    /// Enters the blocked state with a "did you mean" candidate.
    pub fn block_similar(&mut self, scanned: impl Into<String>, candidate_upc: impl Into<String>) {
        self.state = ScanState::Blocked {
            pending: PendingScan::Similar {
                scanned: scanned.into(),
                candidate_upc: candidate_upc.into(),
            },
        };
    }

    /// Declining the similar candidate falls through to the not-found flow
    /// for the originally scanned code.
    pub fn decline_similar(&mut self) {
        if let ScanState::Blocked {
            pending: PendingScan::Similar { scanned, .. },
        } = &self.state
        {
            let upc = scanned.clone();
            self.block_not_found(upc);
        }
    }

    /// Clears the pending scan (operator added, sold manually, accepted the
    /// candidate, or cancelled) and returns to idle.
    pub fn resolve(&mut self) -> Option<PendingScan> {
        if let ScanState::Blocked { pending } = &self.state {
            let pending = pending.clone();
            self.state = ScanState::Idle;
            Some(pending)
        } else {
            None
        }
    }

    /// The unresolved scan, if any.
    pub fn pending(&self) -> Option<&PendingScan> {
        match &self.state {
            ScanState::Blocked { pending } => Some(pending),
            _ => None,
        }
    }

    /// Whether the machine is refusing scan input.
    pub fn is_blocked(&self) -> bool {
        matches!(self.state, ScanState::Blocked { .. })
    }
}

// =============================================================================
// Similarity Search
// =============================================================================

/// Looks for a near-miss catalog match before declaring a scanned code not
/// found. Returns the first candidate in catalog order.
///
/// A candidate matches when:
/// - (a) one UPC is a substring of the other (truncated scans, check-digit
///   prefixes), or
/// - (b) both are at least 12 characters and their last 12 characters are
///   equal (EAN-13 vs UPC-A), or
/// - (c) they are equal after stripping leading zeros.
pub fn find_similar<'a>(scanned: &str, catalog: &'a [Product]) -> Option<&'a Product> {
    catalog.iter().find(|p| upc_similar(scanned, &p.upc))
}

fn upc_similar(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    if a.contains(b) || b.contains(a) {
        return true;
    }

    if a.len() >= 12 && b.len() >= 12 && a[a.len() - 12..] == b[b.len() - 12..] {
        return true;
    }

    a.trim_start_matches('0') == b.trim_start_matches('0')
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_STORE_ID;
    use chrono::Utc;

    fn product(upc: &str) -> Product {
        Product {
            id: format!("id-{upc}"),
            store_id: DEFAULT_STORE_ID.to_string(),
            upc: upc.to_string(),
            name: format!("Product {upc}"),
            price_cents: 100,
            inventory: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn feed(machine: &mut ScanMachine, keys: &str, now: Instant) -> Vec<KeyOutcome> {
        keys.chars().map(|c| machine.on_key(c, now)).collect()
    }

    #[test]
    fn test_digits_then_enter_dispatch() {
        let mut machine = ScanMachine::new();
        let now = Instant::now();

        feed(&mut machine, "049000", now);
        match machine.on_key('\n', now) {
            KeyOutcome::Dispatch(code) => assert_eq!(code, "049000"),
            other => panic!("expected dispatch, got {other:?}"),
        }
        assert!(machine.deadline().is_none());
    }

    #[test]
    fn test_enter_with_empty_buffer_is_ignored() {
        let mut machine = ScanMachine::new();
        assert_eq!(machine.on_key('\n', Instant::now()), KeyOutcome::Ignored);
    }

    #[test]
    fn test_stale_buffer_is_discarded() {
        let mut machine = ScanMachine::with_timeout(Duration::from_millis(50));
        let start = Instant::now();

        feed(&mut machine, "123", start);
        assert!(machine.expire_stale(start + Duration::from_millis(60)));

        // After expiry the old digits are gone; a fresh scan starts clean.
        let later = start + Duration::from_millis(100);
        feed(&mut machine, "777", later);
        match machine.on_key('\n', later) {
            KeyOutcome::Dispatch(code) => assert_eq!(code, "777"),
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[test]
    fn test_new_digit_rearms_deadline() {
        let mut machine = ScanMachine::with_timeout(Duration::from_millis(50));
        let start = Instant::now();

        machine.on_key('1', start);
        let tick = start + Duration::from_millis(40);
        machine.on_key('2', tick);

        // The first deadline would have passed, but the second keystroke
        // superseded it.
        assert!(!machine.expire_stale(start + Duration::from_millis(60)));
        assert_eq!(machine.deadline(), Some(tick + Duration::from_millis(50)));
    }

    #[test]
    fn test_blocked_rejects_scan_activity() {
        let mut machine = ScanMachine::new();
        let now = Instant::now();
        machine.block_not_found("999999");

        let outcomes = feed(&mut machine, "12345", now);
        assert!(outcomes
            .iter()
            .all(|o| *o == KeyOutcome::RejectedWhileBlocked));
        assert_eq!(machine.on_key('\n', now), KeyOutcome::RejectedWhileBlocked);

        // The pending not-found UPC is untouched.
        assert_eq!(
            machine.pending(),
            Some(&PendingScan::NotFound {
                upc: "999999".to_string()
            })
        );
    }

    #[test]
    fn test_decline_similar_falls_through_to_not_found() {
        let mut machine = ScanMachine::new();
        machine.block_similar("0123", "123");

        machine.decline_similar();
        assert_eq!(
            machine.pending(),
            Some(&PendingScan::NotFound {
                upc: "0123".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_returns_to_idle() {
        let mut machine = ScanMachine::new();
        machine.block_not_found("999999");

        let pending = machine.resolve().unwrap();
        assert_eq!(pending.scanned_upc(), "999999");
        assert!(!machine.is_blocked());

        let now = Instant::now();
        assert_eq!(machine.on_key('1', now), KeyOutcome::Buffered);
    }

    #[test]
    fn test_similarity_substring() {
        let catalog = vec![product("049000050103")];
        assert!(find_similar("49000050103", &catalog).is_some());
        assert!(find_similar("0490000501031", &catalog).is_some());
    }

    #[test]
    fn test_similarity_last_twelve() {
        // Two 13-digit codes sharing their last 12 digits (differing leading
        // digit) carry the same embedded UPC-A.
        let catalog = vec![product("5012345678900")];
        assert!(find_similar("9012345678900", &catalog).is_some());

        // A shared suffix shorter than 12 digits is not enough.
        let catalog = vec![product("5099345678900")];
        assert!(find_similar("9012345678900", &catalog).is_none());
    }

    #[test]
    fn test_similarity_leading_zeros() {
        let catalog = vec![product("000123")];
        assert!(find_similar("123", &catalog).is_some());
    }

    #[test]
    fn test_similarity_no_match() {
        let catalog = vec![product("049000050103")];
        assert!(find_similar("111111", &catalog).is_none());
    }

    #[test]
    fn test_similarity_first_match_wins() {
        let catalog = vec![product("00555"), product("555")];
        let hit = find_similar("0555", &catalog).unwrap();
        assert_eq!(hit.upc, "00555");
    }
}
