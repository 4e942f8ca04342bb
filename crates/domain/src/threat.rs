use serde::{Deserialize, Serialize};

/// Broad family of an attack signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatCategory {
    /// Script or URI based injection into rendered content.
    ScriptInjection,
    /// SQL keyword sequences.
    SqlInjection,
    /// Object prototype tampering tokens.
    PrototypePollution,
}

/// A named, case-insensitive text signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreatSignature {
    /// Stable signature name used in audit details and metrics.
    pub name: &'static str,
    /// Signature family.
    pub category: ThreatCategory,
    /// Regular expression source, matched case-insensitively.
    pub pattern: &'static str,
}

/// Ordered signature table. The first matching entry is reported.
pub const THREAT_SIGNATURES: &[ThreatSignature] = &[
    ThreatSignature {
        name: "javascript_uri",
        category: ThreatCategory::ScriptInjection,
        pattern: r"javascript\s*:",
    },
    ThreatSignature {
        name: "script_tag",
        category: ThreatCategory::ScriptInjection,
        pattern: r"<\s*script",
    },
    ThreatSignature {
        name: "eval_call",
        category: ThreatCategory::ScriptInjection,
        pattern: r"\beval\s*\(",
    },
    ThreatSignature {
        name: "union_select",
        category: ThreatCategory::SqlInjection,
        pattern: r"\bunion\s+(all\s+)?select\b",
    },
    ThreatSignature {
        name: "drop_table",
        category: ThreatCategory::SqlInjection,
        pattern: r"\bdrop\s+table\b",
    },
    ThreatSignature {
        name: "delete_from",
        category: ThreatCategory::SqlInjection,
        pattern: r"\bdelete\s+from\b",
    },
    ThreatSignature {
        name: "insert_into",
        category: ThreatCategory::SqlInjection,
        pattern: r"\binsert\s+into\b",
    },
    ThreatSignature {
        name: "update_set",
        category: ThreatCategory::SqlInjection,
        pattern: r"\bupdate\s+(\S+\s+)?set\b",
    },
    ThreatSignature {
        name: "proto_token",
        category: ThreatCategory::PrototypePollution,
        pattern: r"__proto__",
    },
    ThreatSignature {
        name: "constructor_token",
        category: ThreatCategory::PrototypePollution,
        pattern: r"\bconstructor\b",
    },
];
