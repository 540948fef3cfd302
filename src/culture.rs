//! Number-formatting conventions for the cultures the parser understands.

use core::fmt;

use crate::{NumericError, Result};

/// Separator and sign symbols of one culture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Culture {
    pub name: &'static str,
    pub decimal_separator: char,
    pub group_separator: char,
    pub negative_sign: char,
    pub positive_sign: char,
}

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';
const MINUS: char = '\u{2212}';

const fn culture(name: &'static str, decimal_separator: char, group_separator: char) -> Culture {
    Culture {
        name,
        decimal_separator,
        group_separator,
        negative_sign: '-',
        positive_sign: '+',
    }
}

const fn with_minus(culture: Culture, negative_sign: char) -> Culture {
    Culture {
        negative_sign,
        ..culture
    }
}

static CULTURES: [Culture; 27] = [
    Culture::INVARIANT,
    culture("en-US", '.', ','),
    culture("en-GB", '.', ','),
    culture("en-AU", '.', ','),
    culture("en-CA", '.', ','),
    culture("da-DK", ',', '.'),
    culture("de-DE", ',', '.'),
    culture("de-CH", '.', '\u{2019}'),
    culture("es-ES", ',', '.'),
    culture("fr-FR", ',', NARROW_NBSP),
    culture("fr-CA", ',', NBSP),
    with_minus(culture("nb-NO", ',', NBSP), MINUS),
    with_minus(culture("sv-SE", ',', NBSP), MINUS),
    with_minus(culture("fi-FI", ',', NBSP), MINUS),
    culture("pl-PL", ',', NBSP),
    culture("ru-RU", ',', NBSP),
    culture("cs-CZ", ',', NBSP),
    culture("pt-PT", ',', NBSP),
    culture("it-IT", ',', '.'),
    culture("nl-NL", ',', '.'),
    culture("pt-BR", ',', '.'),
    culture("tr-TR", ',', '.'),
    culture("ja-JP", '.', ','),
    culture("zh-CN", '.', ','),
    culture("ko-KR", '.', ','),
    culture("hi-IN", '.', ','),
    culture("en-IN", '.', ','),
];

impl Culture {
    /// Culture-neutral conventions: `.` decimal point, `,` groups.
    pub const INVARIANT: Culture = culture("", '.', ',');

    /// Looks up a culture by name such as `"en-US"` or `"da_dk"`. The empty
    /// name and `"invariant"` select [`Culture::INVARIANT`].
    ///
    /// # Errors
    /// Returns [`NumericError::UnknownCulture`] when the name is not in the
    /// built-in table.
    pub fn from_name(name: &str) -> Result<&'static Culture> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("invariant") {
            return Ok(&CULTURES[0]);
        }
        CULTURES
            .iter()
            .find(|c| {
                c.name.len() == name.len()
                    && c.name
                        .bytes()
                        .zip(name.bytes())
                        .all(|(a, b)| a.eq_ignore_ascii_case(&if b == b'_' { b'-' } else { b }))
            })
            .ok_or_else(|| {
                tracing::debug!(culture = name, "unknown culture");
                NumericError::UnknownCulture
            })
    }

    /// Every built-in culture, invariant first.
    pub fn all() -> &'static [Culture] {
        &CULTURES
    }

    /// Whether `c` separates digit groups in this culture. A plain space
    /// stands in for the no-break spaces some cultures group with.
    #[inline]
    pub(crate) fn is_group_separator(&self, c: char) -> bool {
        c == self.group_separator
            || (c == ' ' && matches!(self.group_separator, NBSP | NARROW_NBSP))
    }

    /// ASCII signs are accepted alongside the culture's own symbols.
    #[inline]
    pub(crate) fn is_negative_sign(&self, c: char) -> bool {
        c == self.negative_sign || c == '-'
    }

    #[inline]
    pub(crate) fn is_positive_sign(&self, c: char) -> bool {
        c == self.positive_sign || c == '+'
    }
}

impl Default for Culture {
    fn default() -> Self {
        Culture::INVARIANT
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str("invariant")
        } else {
            f.write_str(self.name)
        }
    }
}
