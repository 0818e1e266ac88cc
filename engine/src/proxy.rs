//! Proxy ("pouvoir") ledger.
//!
//! Validates and mutates proxy delegations for a meeting. The legality
//! rules are anti-chain and anti-concentration: a delegation may not
//! extend an existing chain in either direction, and a receiver may not
//! hold more than the configured number of proxies. Both checks run
//! inside the store's locked transaction so that two concurrent requests
//! cannot both pass a check before either commits.

use crate::error::{EngineError, RuleCode};
use crate::events::DomainEvent;
use plenum_store::{MemberStore, ProxyRecord, ProxyStore, StoreError};
use plenum_types::{Context, MeetingId, MemberId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default maximum number of active proxies one receiver may hold.
pub const DEFAULT_RECEIVER_CAP: u64 = 99;

/// What an upsert did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProxyOutcome {
    /// A new or replacing active edge was written.
    Delegated(ProxyRecord),
    /// The giver's active edge was revoked.
    Revoked(ProxyRecord),
    /// Revocation was requested but the giver had no active edge.
    NoActiveEdge,
}

/// The applied change plus the domain events it produced, for an external
/// audit/notification dispatcher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProxyUpdate {
    pub outcome: ProxyOutcome,
    pub events: Vec<DomainEvent>,
}

/// Validates and mutates proxy delegations.
pub struct ProxyLedger<'a> {
    proxies: &'a dyn ProxyStore,
    members: &'a dyn MemberStore,
    receiver_cap: u64,
}

impl<'a> ProxyLedger<'a> {
    pub fn new(proxies: &'a dyn ProxyStore, members: &'a dyn MemberStore) -> Self {
        Self::with_cap(proxies, members, DEFAULT_RECEIVER_CAP)
    }

    pub fn with_cap(
        proxies: &'a dyn ProxyStore,
        members: &'a dyn MemberStore,
        receiver_cap: u64,
    ) -> Self {
        Self {
            proxies,
            members,
            receiver_cap,
        }
    }

    /// Set, replace, or revoke the giver's delegation for a meeting.
    ///
    /// `receiver = None` revokes the current active edge. On any rule
    /// violation the transaction is aborted and no state changes.
    pub fn upsert(
        &self,
        ctx: &Context,
        meeting_id: MeetingId,
        giver: MemberId,
        receiver: Option<MemberId>,
    ) -> Result<ProxyUpdate, EngineError> {
        if receiver == Some(giver) {
            return Err(EngineError::rule(
                RuleCode::ProxySelfForbidden,
                format!("member {giver} cannot delegate to themselves"),
            ));
        }
        self.require_member(ctx, giver)?;
        if let Some(receiver) = receiver {
            self.require_member(ctx, receiver)?;
        }

        match receiver {
            None => self.revoke(ctx, meeting_id, giver),
            Some(receiver) => self.delegate(ctx, meeting_id, giver, receiver),
        }
    }

    fn revoke(
        &self,
        ctx: &Context,
        meeting_id: MeetingId,
        giver: MemberId,
    ) -> Result<ProxyUpdate, EngineError> {
        let mut revoked: Option<ProxyRecord> = None;
        self.proxies
            .transactionally(meeting_id, &[giver], &mut |txn| {
                let prior = txn.active_outgoing(meeting_id, giver)?;
                if let Some(edge) = prior {
                    txn.revoke_active(meeting_id, giver, ctx.now)?;
                    revoked = Some(edge);
                }
                Ok(())
            })?;

        match revoked {
            None => Ok(ProxyUpdate {
                outcome: ProxyOutcome::NoActiveEdge,
                events: Vec::new(),
            }),
            Some(edge) => {
                debug!(meeting = %meeting_id, giver = %giver, "proxy revoked");
                let events = vec![DomainEvent::ProxyRevoked {
                    meeting_id,
                    giver,
                    receiver: edge.receiver,
                    at: ctx.now,
                }];
                Ok(ProxyUpdate {
                    outcome: ProxyOutcome::Revoked(edge),
                    events,
                })
            }
        }
    }

    fn delegate(
        &self,
        ctx: &Context,
        meeting_id: MeetingId,
        giver: MemberId,
        receiver: MemberId,
    ) -> Result<ProxyUpdate, EngineError> {
        let cap = self.receiver_cap;
        let mut violation: Option<EngineError> = None;
        let mut previous: Option<ProxyRecord> = None;
        let mut written: Option<ProxyRecord> = None;

        let tx_result = self
            .proxies
            .transactionally(meeting_id, &[giver, receiver], &mut |txn| {
                // Chain rule, outgoing side: the receiver has delegated out,
                // so accepting would build giver -> receiver -> other.
                if txn.active_outgoing(meeting_id, receiver)?.is_some() {
                    violation = Some(EngineError::rule(
                        RuleCode::ProxyChainForbidden,
                        format!("member {receiver} has already delegated their vote"),
                    ));
                    return Err(StoreError::Aborted(
                        RuleCode::ProxyChainForbidden.as_str().to_string(),
                    ));
                }
                // Chain rule, incoming side: the giver holds proxies, so
                // delegating out would re-route other -> giver -> receiver.
                if txn.active_incoming_count(meeting_id, giver)? > 0 {
                    violation = Some(EngineError::rule(
                        RuleCode::ProxyChainForbidden,
                        format!("member {giver} already holds proxies and cannot delegate"),
                    ));
                    return Err(StoreError::Aborted(
                        RuleCode::ProxyChainForbidden.as_str().to_string(),
                    ));
                }
                // Cap rule: replacing the giver's own edge to the same
                // receiver does not raise the in-degree.
                let prior = txn.active_outgoing(meeting_id, giver)?;
                let incoming = txn.active_incoming_count(meeting_id, receiver)?;
                let already_counted =
                    matches!(&prior, Some(edge) if edge.receiver == receiver) as u64;
                if incoming.saturating_sub(already_counted) >= cap {
                    violation = Some(EngineError::rule(
                        RuleCode::ProxyCapReached,
                        format!("member {receiver} already holds {incoming} of {cap} proxies"),
                    ));
                    return Err(StoreError::Aborted(
                        RuleCode::ProxyCapReached.as_str().to_string(),
                    ));
                }

                let record = ProxyRecord {
                    meeting_id,
                    giver,
                    receiver,
                    created_at: ctx.now,
                    revoked_at: None,
                };
                txn.upsert_edge(&record)?;
                previous = prior;
                written = Some(record);
                Ok(())
            });

        if let Some(violation) = violation {
            return Err(violation);
        }
        tx_result?;

        let record = written.ok_or_else(|| {
            EngineError::Store(StoreError::Backend(
                "proxy transaction committed without writing an edge".to_string(),
            ))
        })?;
        debug!(
            meeting = %meeting_id,
            giver = %giver,
            receiver = %receiver,
            replaced = previous.is_some(),
            "proxy delegated"
        );
        let events = vec![match &previous {
            Some(prior) => DomainEvent::ProxyReplaced {
                meeting_id,
                giver,
                previous_receiver: prior.receiver,
                receiver,
                at: ctx.now,
            },
            None => DomainEvent::ProxyDelegated {
                meeting_id,
                giver,
                receiver,
                at: ctx.now,
            },
        }];
        Ok(ProxyUpdate {
            outcome: ProxyOutcome::Delegated(record),
            events,
        })
    }

    /// The meeting's active delegations, sorted by giver for stable output.
    pub fn active(&self, meeting_id: MeetingId) -> Result<Vec<ProxyRecord>, EngineError> {
        let mut edges = self.proxies.active_edges(meeting_id)?;
        edges.sort_by_key(|edge| edge.giver);
        Ok(edges)
    }

    fn require_member(&self, ctx: &Context, member: MemberId) -> Result<(), EngineError> {
        if self.members.belongs_to_tenant(member, ctx.tenant_id)? {
            Ok(())
        } else {
            Err(EngineError::NotFound(format!(
                "member {member} in tenant {}",
                ctx.tenant_id
            )))
        }
    }
}
