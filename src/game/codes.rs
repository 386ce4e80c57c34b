//! Secret redeem codes.
//!
//! Matching is whitespace-trimmed and case-insensitive. Grant codes pay out
//! on every redemption; unlock codes are one-shot and report "already
//! active" on repeats (the engine handles that distinction).

use super::modes::ModeId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CodeEffect {
    /// Adds currency (and lifetime earnings). Redeemable any number of times.
    GrantCurrency(f64),
    /// Reveals the admin panel for this profile.
    UnlockAdmin,
    /// Discovers an alternate skin.
    UnlockMode(ModeId),
}

pub struct CodeDef {
    pub code: &'static str,
    pub effect: CodeEffect,
}

/// The fixed code table.
pub fn all() -> &'static [CodeDef] {
    &[
        CodeDef {
            code: "BORNTOCODE",
            effect: CodeEffect::GrantCurrency(5000.0),
        },
        CodeDef {
            code: "OVERCLOCK",
            effect: CodeEffect::UnlockAdmin,
        },
        CodeDef {
            code: "NEONWAVE",
            effect: CodeEffect::UnlockMode(ModeId::Neon),
        },
    ]
}

/// Look up a raw user entry. The caller is expected to have rejected empty
/// input already; this only answers known/unknown.
pub fn lookup(raw: &str) -> Option<&'static CodeDef> {
    let wanted = raw.trim().to_ascii_uppercase();
    all().iter().find(|def| def.code == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_and_trimmed() {
        assert!(lookup("BORNTOCODE").is_some());
        assert!(lookup("borntocode").is_some());
        assert!(lookup("  BornToCode  ").is_some());
    }

    #[test]
    fn unknown_code_misses() {
        assert!(lookup("UPUPDOWNDOWN").is_none());
    }

    #[test]
    fn codes_are_unique_and_uppercase() {
        let table = all();
        for def in table {
            assert_eq!(def.code, def.code.to_ascii_uppercase());
            assert_eq!(
                table.iter().filter(|d| d.code == def.code).count(),
                1,
                "duplicate code {}",
                def.code
            );
        }
    }

    #[test]
    fn grant_code_amount() {
        match lookup("BORNTOCODE").unwrap().effect {
            CodeEffect::GrantCurrency(n) => assert_eq!(n, 5000.0),
            other => panic!("unexpected effect {:?}", other),
        }
    }
}
