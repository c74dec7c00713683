//! Identity Enrichment
//!
//! Subscriber identities usually travel on one packet of a dialogue only
//! (the Invoke carrying an IMSI, a later Continue carrying the MSISDN...).
//! The index records every identity against the transaction ids of the packet
//! that carried it, and report items with no identity of their own are
//! backfilled through their OTID.

use std::collections::HashMap;

use tracing::trace;

use super::report::UnansweredRequest;
use crate::packet::SubscriberIds;

/// Transaction id → last subscriber identity seen with it
#[derive(Debug, Default, Clone)]
pub struct IdentityIndex {
    imsi: HashMap<String, String>,
    msisdn: HashMap<String, String>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate identities with both transaction ids of a packet. Empty ids
    /// and empty identities are ignored; later packets overwrite earlier ones.
    pub fn record(&mut self, otid: &str, dtid: &str, ids: &SubscriberIds) {
        for tid in [otid, dtid] {
            if tid.is_empty() {
                continue;
            }
            if !ids.imsi.is_empty() {
                self.imsi.insert(tid.to_string(), ids.imsi.clone());
            }
            if !ids.msisdn.is_empty() {
                self.msisdn.insert(tid.to_string(), ids.msisdn.clone());
            }
        }
    }

    pub fn imsi(&self, tid: &str) -> Option<&str> {
        self.imsi.get(tid).map(String::as_str)
    }

    pub fn msisdn(&self, tid: &str) -> Option<&str> {
        self.msisdn.get(tid).map(String::as_str)
    }

    /// Fill empty identity fields of `request` from its OTID. Returns whether
    /// anything was filled in.
    pub fn backfill(&self, request: &mut UnansweredRequest) -> bool {
        let mut filled = false;
        if request.imsi.is_empty() {
            if let Some(imsi) = self.imsi(&request.otid) {
                request.imsi = imsi.to_string();
                filled = true;
            }
        }
        if request.msisdn.is_empty() {
            if let Some(msisdn) = self.msisdn(&request.otid) {
                request.msisdn = msisdn.to_string();
                filled = true;
            }
        }
        if filled {
            trace!(
                otid = %request.otid,
                invoke_id = %request.invoke_id,
                "backfilled subscriber identity"
            );
        }
        filled
    }
}
