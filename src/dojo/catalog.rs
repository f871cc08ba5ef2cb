//! Canonical quest catalog seed.
//!
//! The four DeFi training quests shipped with the dojo. Inserted once by
//! [`crate::dojo::storage::DojoStore::seed_catalog_if_needed`] so operators
//! can add or edit quests afterwards without them being overwritten.

use crate::dojo::types::QuestDefinition;

/// Slugs of the canonical quests, in difficulty order.
pub const CANONICAL_QUEST_SLUGS: [&str; 4] = [
    "liquidity-kata",
    "yield-sprint",
    "arbitrage-master",
    "defi-ninja",
];

/// Build the canonical quest definitions.
pub fn canonical_quest_seed() -> Vec<QuestDefinition> {
    vec![
        QuestDefinition::new(
            "liquidity-kata",
            "Liquidity Kata",
            "Master the art of providing liquidity to DeFi pools. Learn to add liquidity \
             to STX/sBTC pairs and understand impermanent loss.",
            1,
        )
        .with_step(
            "Connect to DeFi Pool",
            "Connect to the STX/sBTC liquidity pool on a DeFi protocol",
            "Connect Pool",
        )
        .with_step(
            "Add Liquidity",
            "Add 1 STX and 0.001 sBTC to the liquidity pool",
            "Add Liquidity",
        )
        .with_step(
            "Monitor Position",
            "Check your liquidity position and understand impermanent loss",
            "Check Position",
        )
        .with_step(
            "Complete Quest",
            "Successfully provided liquidity and learned about DeFi pools",
            "Complete Quest",
        )
        .with_reward_xp(50)
        .with_badge(1),
        QuestDefinition::new(
            "yield-sprint",
            "Yield Sprint",
            "Race to maximize your yield farming returns. Learn to identify high-yield \
             opportunities and manage risk.",
            2,
        )
        .with_step(
            "Research Yield Opportunities",
            "Analyze different yield farming opportunities in the ecosystem",
            "Research",
        )
        .with_step(
            "Calculate APY",
            "Calculate the Annual Percentage Yield for different strategies",
            "Calculate",
        )
        .with_step(
            "Assess Risks",
            "Evaluate the risks associated with each yield strategy",
            "Assess",
        )
        .with_step(
            "Complete Quest",
            "Successfully identified the best yield farming opportunity",
            "Complete Quest",
        )
        .with_reward_xp(75)
        .with_badge(2),
        QuestDefinition::new(
            "arbitrage-master",
            "Arbitrage Master",
            "Become a master of price differences across exchanges. Learn to spot and \
             execute profitable arbitrage opportunities.",
            3,
        )
        .with_step(
            "Learn DeFi Concepts",
            "Understand the basic concepts of decentralized finance",
            "Learn",
        )
        .with_step(
            "Practice Trading",
            "Practice trading strategies in a simulated environment",
            "Practice",
        )
        .with_step(
            "Complete Quest",
            "Successfully completed the DeFi training quest",
            "Complete Quest",
        )
        .with_reward_xp(100)
        .with_badge(3),
        QuestDefinition::new(
            "defi-ninja",
            "DeFi Ninja",
            "Master advanced DeFi strategies including flash loans, complex swaps, and \
             protocol interactions.",
            4,
        )
        .with_step(
            "Learn DeFi Concepts",
            "Understand the basic concepts of decentralized finance",
            "Learn",
        )
        .with_step(
            "Practice Trading",
            "Practice trading strategies in a simulated environment",
            "Practice",
        )
        .with_step(
            "Complete Quest",
            "Successfully completed the DeFi training quest",
            "Complete Quest",
        )
        .with_reward_xp(150)
        .with_badge(4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_seed_is_valid_and_complete() {
        let quests = canonical_quest_seed();
        assert_eq!(quests.len(), CANONICAL_QUEST_SLUGS.len());
        for (quest, slug) in quests.iter().zip(CANONICAL_QUEST_SLUGS) {
            assert_eq!(quest.id, slug);
            quest.validate().expect("seed quest is valid");
            assert!(quest.base_reward_xp > 0);
            assert!(quest.badge_id > 0);
        }
    }

    #[test]
    fn difficulty_and_rewards_scale_together() {
        let quests = canonical_quest_seed();
        for pair in quests.windows(2) {
            assert!(pair[0].difficulty < pair[1].difficulty);
            assert!(pair[0].base_reward_xp < pair[1].base_reward_xp);
        }
    }
}
