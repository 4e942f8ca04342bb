use finguard_core::{AppError, AppResult};
use finguard_domain::ThreatSignature;
use regex::Regex;

/// Compiled, ordered signature table.
#[derive(Debug, Clone)]
pub(super) struct SignatureMatcher {
    compiled: Vec<(ThreatSignature, Regex)>,
}

impl SignatureMatcher {
    pub(super) fn compile(signatures: &[ThreatSignature]) -> AppResult<Self> {
        let compiled = signatures
            .iter()
            .map(|signature| {
                Regex::new(&format!("(?i){}", signature.pattern))
                    .map(|regex| (*signature, regex))
                    .map_err(|error| {
                        AppError::Internal(format!(
                            "failed to compile threat signature '{}': {error}",
                            signature.name
                        ))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self { compiled })
    }

    /// Returns the first signature matching the input.
    pub(super) fn first_match(&self, input: &str) -> Option<&ThreatSignature> {
        self.compiled
            .iter()
            .find(|(_, regex)| regex.is_match(input))
            .map(|(signature, _)| signature)
    }
}
