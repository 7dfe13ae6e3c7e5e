use crate::ConfigError;

/// The 33 uppercase letters of the Russian alphabet, Ё placed after Е
pub const RUSSIAN_UPPERCASE: &str = "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";

/// Target alphabet used as the inclusion and termination filter
///
/// A letter is a member only when it is exactly one character and that
/// character is part of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    letters: Vec<char>,
}

impl Alphabet {
    /// Builds an alphabet from a string of distinct characters
    ///
    /// # Examples
    ///
    /// ```
    /// use beast_tally::tally::Alphabet;
    ///
    /// let alphabet = Alphabet::new("АБВ").unwrap();
    /// assert!(alphabet.contains("Б"));
    /// assert!(!alphabet.contains("B"));
    /// assert!(!alphabet.contains("АБ"));
    /// ```
    pub fn new(letters: &str) -> Result<Self, ConfigError> {
        let letters: Vec<char> = letters.chars().collect();

        if letters.is_empty() {
            return Err(ConfigError::Validation(
                "alphabet cannot be empty".to_string(),
            ));
        }

        for (idx, c) in letters.iter().enumerate() {
            if c.is_whitespace() {
                return Err(ConfigError::Validation(
                    "alphabet cannot contain whitespace".to_string(),
                ));
            }
            if letters[..idx].contains(c) {
                return Err(ConfigError::Validation(format!(
                    "alphabet contains '{}' more than once",
                    c
                )));
            }
        }

        Ok(Self { letters })
    }

    /// The default Russian uppercase alphabet
    pub fn russian() -> Self {
        Self {
            letters: RUSSIAN_UPPERCASE.chars().collect(),
        }
    }

    /// Returns true if `letter` is a single character of this alphabet
    pub fn contains(&self, letter: &str) -> bool {
        let mut chars = letter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.letters.contains(&c),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::russian()
    }
}
