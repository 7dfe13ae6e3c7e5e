/// Ordered letter counts
///
/// Letters keep the order in which they were first added. An entry can be
/// restarted at zero but never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterTally {
    entries: Vec<(String, u64)>,
}

impl LetterTally {
    /// Creates an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the count for `letter` to zero, creating the entry if needed
    ///
    /// An existing entry keeps its position. Returns `true` if the entry was
    /// newly created.
    pub fn open(&mut self, letter: &str) -> bool {
        match self.position(letter) {
            Some(idx) => {
                self.entries[idx].1 = 0;
                false
            }
            None => {
                self.entries.push((letter.to_string(), 0));
                true
            }
        }
    }

    /// Adds `amount` to the count for `letter`, creating the entry if needed
    ///
    /// Returns `true` if the entry was newly created.
    pub fn add(&mut self, letter: &str, amount: u64) -> bool {
        match self.position(letter) {
            Some(idx) => {
                self.entries[idx].1 += amount;
                false
            }
            None => {
                self.entries.push((letter.to_string(), amount));
                true
            }
        }
    }

    /// Returns the count for `letter`, if present
    pub fn get(&self, letter: &str) -> Option<u64> {
        self.position(letter).map(|idx| self.entries[idx].1)
    }

    /// Returns the first letter added, if any
    pub fn first_letter(&self) -> Option<&str> {
        self.entries.first().map(|(letter, _)| letter.as_str())
    }

    /// Iterates `(letter, count)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(letter, count)| (letter.as_str(), *count))
    }

    /// Returns the letters in insertion order
    pub fn letters(&self) -> Vec<&str> {
        self.entries.iter().map(|(letter, _)| letter.as_str()).collect()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, letter: &str) -> Option<usize> {
        self.entries.iter().position(|(l, _)| l == letter)
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for LetterTally {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut tally = Self::new();
        for (letter, count) in iter {
            tally.add(&letter.into(), count);
        }
        tally
    }
}
