//! Built-in strategy catalog used when no catalog file is configured.

use crate::models::{RiskLevel, StrategyRecord, TeamRole};

fn team(members: &[(&str, u32)]) -> Vec<TeamRole> {
    members
        .iter()
        .map(|(role, count)| TeamRole {
            role: role.to_string(),
            count: *count,
        })
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_catalog() -> Vec<StrategyRecord> {
    vec![
        StrategyRecord {
            id: "strat-001".to_string(),
            name: "Silent Observer".to_string(),
            description: "Low-profile intelligence gathering with minimal engagement. Focus on data collection and pattern recognition.".to_string(),
            risk_level: RiskLevel::Low,
            success_rate: 92,
            recommended_team: team(&[("Intel Analysts", 3), ("Cyber Experts", 1)]),
            tactics: strings(&[
                "Passive network monitoring",
                "Public data harvesting",
                "Behavioral pattern analysis",
                "Stealth infrastructure deployment",
            ]),
            timeline: "2-4 weeks".to_string(),
            tags: strings(&["intelligence", "stealth", "low-risk"]),
        },
        StrategyRecord {
            id: "strat-002".to_string(),
            name: "Digital Fortress".to_string(),
            description: "Comprehensive security hardening operation with active threat hunting and containment measures.".to_string(),
            risk_level: RiskLevel::Medium,
            success_rate: 88,
            recommended_team: team(&[("Cyber Experts", 3), ("AI Developers", 1), ("Intel Analysts", 1)]),
            tactics: strings(&[
                "Infrastructure security audit",
                "Zero-day vulnerability patching",
                "Threat hunting campaigns",
                "Decoy system deployment",
            ]),
            timeline: "3-6 weeks".to_string(),
            tags: strings(&["defense", "security", "containment"]),
        },
        StrategyRecord {
            id: "strat-003".to_string(),
            name: "Shadowhunter".to_string(),
            description: "Active counter-intelligence operation with adversary tracking and deception techniques.".to_string(),
            risk_level: RiskLevel::High,
            success_rate: 76,
            recommended_team: team(&[
                ("Cyber Experts", 2),
                ("Social Engineers", 2),
                ("Intel Analysts", 2),
                ("AI Developers", 1),
            ]),
            tactics: strings(&[
                "Adversary infrastructure identification",
                "Counter-intelligence operations",
                "Honeypot & honeytokens deployment",
                "Advanced attribution techniques",
            ]),
            timeline: "4-8 weeks".to_string(),
            tags: strings(&["offensive", "counter-intel", "deception"]),
        },
        StrategyRecord {
            id: "strat-004".to_string(),
            name: "Financial Guardian".to_string(),
            description: "Specialized strategy for protecting financial systems and transactions with advanced fraud detection.".to_string(),
            risk_level: RiskLevel::Medium,
            success_rate: 90,
            recommended_team: team(&[("AI Developers", 3), ("Cyber Experts", 2), ("Intel Analysts", 1)]),
            tactics: strings(&[
                "Transaction monitoring systems",
                "Behavioral analytics",
                "Anomaly detection algorithms",
                "Fraud pattern recognition",
            ]),
            timeline: "2-5 weeks".to_string(),
            tags: strings(&["financial", "protection", "monitoring"]),
        },
        StrategyRecord {
            id: "strat-005".to_string(),
            name: "Deep Infiltration".to_string(),
            description: "High-risk deep cover operation requiring extensive social engineering and persistent access strategies.".to_string(),
            risk_level: RiskLevel::High,
            success_rate: 72,
            recommended_team: team(&[
                ("Social Engineers", 3),
                ("Cyber Experts", 2),
                ("Intel Analysts", 2),
                ("AI Developers", 1),
            ]),
            tactics: strings(&[
                "Deep cover identity creation",
                "Social network infiltration",
                "Trust building operations",
                "Persistent access mechanisms",
            ]),
            timeline: "6-12 weeks".to_string(),
            tags: strings(&["infiltration", "social-engineering", "high-risk"]),
        },
    ]
}
