use async_trait::async_trait;
use log::warn;
use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::accounts::RiskProfile;
use crate::Result;

use super::allocation_model::{
    AllocationDecision, AllocationStrategy, TargetAllocation,
};
use super::allocation_traits::{AllocationService, PeerRecommendationProvider};

/// Fixed policy table mapping a risk profile to a sleeve-weight vector.
pub fn model_allocation(risk_profile: RiskProfile) -> TargetAllocation {
    match risk_profile {
        RiskProfile::Stable => TargetAllocation::new(dec!(20), dec!(60), dec!(20)),
        RiskProfile::Conservative => TargetAllocation::new(dec!(15), dec!(50), dec!(35)),
        RiskProfile::Neutral => TargetAllocation::new(dec!(10), dec!(40), dec!(50)),
        RiskProfile::Growth => TargetAllocation::new(dec!(10), dec!(30), dec!(60)),
        RiskProfile::Aggressive => TargetAllocation::new(dec!(5), dec!(20), dec!(75)),
    }
}

pub struct AllocationServiceImpl {
    peer_provider: Arc<dyn PeerRecommendationProvider>,
}

impl AllocationServiceImpl {
    pub fn new(peer_provider: Arc<dyn PeerRecommendationProvider>) -> Self {
        Self { peer_provider }
    }
}

#[async_trait]
impl AllocationService for AllocationServiceImpl {
    async fn resolve(
        &self,
        customer_id: &str,
        risk_profile: RiskProfile,
        strategy: AllocationStrategy,
    ) -> Result<AllocationDecision> {
        let model = model_allocation(risk_profile);

        let decision = match strategy {
            AllocationStrategy::Model => AllocationDecision {
                target: model,
                model_input: Some(model),
                peer_input: None,
                blend_weights: None,
                source: "MODEL".to_string(),
            },
            AllocationStrategy::Blended { weights } => {
                match self
                    .peer_provider
                    .peer_allocation(customer_id, risk_profile)
                    .await
                {
                    Ok(peer) => {
                        peer.validate()?;
                        AllocationDecision {
                            target: model.blend(&peer, &weights),
                            model_input: Some(model),
                            peer_input: Some(peer),
                            blend_weights: Some(weights),
                            source: "BLENDED".to_string(),
                        }
                    }
                    Err(e) => {
                        // Peer similarity is an enrichment; the policy table
                        // alone still yields a valid target.
                        warn!(
                            "Peer recommendation unavailable for customer {}, using model only: {}",
                            customer_id, e
                        );
                        AllocationDecision {
                            target: model,
                            model_input: Some(model),
                            peer_input: None,
                            blend_weights: None,
                            source: "MODEL_FALLBACK".to_string(),
                        }
                    }
                }
            }
        };

        decision.target.validate()?;
        Ok(decision)
    }

    fn resolve_manual(&self, target: TargetAllocation) -> Result<AllocationDecision> {
        target.validate()?;
        Ok(AllocationDecision::manual(target))
    }
}
