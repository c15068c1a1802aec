use std::fmt::Formatter;

/// 1-based spreadsheet column (`A` = 1).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Column(u32);

impl Column {
    /// Column for a zero-based header position.
    pub fn from_index(index: usize) -> Self {
        Column(u32::try_from(index).unwrap_or(u32::MAX - 1) + 1)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", number_to_letters(self.0))
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Column(u32: {}, letters: {})", self.0, self)
    }
}

fn number_to_letters(number: u32) -> String {
    let mut number = number;
    let mut result = String::new();
    while number > 0 {
        let remainder = (number - 1) % 26;
        let letter = (remainder as u8 + b'A') as char;
        result.push(letter);
        number = (number - remainder) / 26;
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_index() {
        assert_eq!(Column::from_index(0).to_string(), "A");
        assert_eq!(Column::from_index(10).to_string(), "K");
        assert_eq!(Column::from_index(25).to_string(), "Z");
        assert_eq!(Column::from_index(26).to_string(), "AA");
    }

    #[test]
    fn test_column_display_az() {
        assert_eq!(Column(26 + 26).to_string(), "AZ");
    }

    #[test]
    fn test_column_display_zza() {
        assert_eq!(Column(26 * 26 * 26 + 26 * 26 + 1).to_string(), "ZZA");
    }
}
