//! Random password generator.
//!
//! Used for two things: per-record salts and user-facing generated
//! passwords.  The character mix and the repeat policy come from
//! `GeneratorSettings`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::{PassVaultError, Result};

const LOWER_LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "~!@#$%^&*()_+`-={}|[]\\:\"<>?,./";

/// Shape of a generated password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Total number of characters.
    pub length: usize,
    /// How many of them are digits.
    pub num_digits: usize,
    /// How many of them are symbols.
    pub num_symbols: usize,
    /// Only lower-case letters when `true`.
    #[serde(default)]
    pub no_upper: bool,
    /// Allow the same character to appear more than once.
    #[serde(default)]
    pub allow_repeat: bool,
}

impl GeneratorSettings {
    /// Settings used for per-record salts.
    pub fn salt_default() -> Self {
        Self {
            length: 32,
            num_digits: 7,
            num_symbols: 8,
            no_upper: false,
            allow_repeat: false,
        }
    }

    /// Settings used for generated account passwords.
    pub fn password_default() -> Self {
        Self {
            length: 12,
            num_digits: 4,
            num_symbols: 4,
            no_upper: false,
            allow_repeat: false,
        }
    }

    /// Same settings with a different total length.
    pub fn with_length(&self, length: usize) -> Self {
        Self {
            length,
            ..self.clone()
        }
    }

    fn letters(&self) -> String {
        if self.no_upper {
            LOWER_LETTERS.to_string()
        } else {
            format!("{LOWER_LETTERS}{UPPER_LETTERS}")
        }
    }

    /// Check that a password with these settings can actually be built.
    pub fn validate(&self) -> Result<()> {
        if self.length == 0 {
            return Err(PassVaultError::ConfigError(
                "generated length must be greater than zero".into(),
            ));
        }

        let non_letters = self
            .num_digits
            .checked_add(self.num_symbols)
            .filter(|n| *n <= self.length)
            .ok_or_else(|| {
                PassVaultError::ConfigError(format!(
                    "{} digits and {} symbols do not fit into {} characters",
                    self.num_digits, self.num_symbols, self.length
                ))
            })?;

        if !self.allow_repeat {
            let num_letters = self.length - non_letters;
            let checks = [
                ("letters", num_letters, self.letters().len()),
                ("digits", self.num_digits, DIGITS.len()),
                ("symbols", self.num_symbols, SYMBOLS.len()),
            ];
            for (class, wanted, available) in checks {
                if wanted > available {
                    return Err(PassVaultError::ConfigError(format!(
                        "{wanted} unique {class} requested but only {available} exist (enable allow_repeat)"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Generate a random password shaped by `settings`.
///
/// Every character is inserted at a random position, so the classes
/// are interleaved rather than grouped.
pub fn generate(settings: &GeneratorSettings) -> Result<Zeroizing<String>> {
    settings.validate()?;

    let letters = settings.letters();
    let num_letters = settings.length - settings.num_digits - settings.num_symbols;

    let mut rng = rand::rng();
    let mut out = Zeroizing::new(String::with_capacity(settings.length));

    let classes = [
        (letters.as_bytes(), num_letters),
        (DIGITS.as_bytes(), settings.num_digits),
        (SYMBOLS.as_bytes(), settings.num_symbols),
    ];

    for (charset, count) in classes {
        for _ in 0..count {
            let ch = pick(&mut rng, charset, &out, settings.allow_repeat);
            // All charsets are ASCII, so byte positions are char boundaries.
            let pos = rng.random_range(0..=out.len());
            out.insert(pos, ch);
        }
    }

    Ok(out)
}

fn pick<R: Rng>(rng: &mut R, charset: &[u8], existing: &str, allow_repeat: bool) -> char {
    loop {
        let ch = char::from(charset[rng.random_range(0..charset.len())]);
        if allow_repeat || !existing.contains(ch) {
            return ch;
        }
    }
}
