//! Board coordinates as players write them
//!
//! Columns are letters (`A` is column 0), rows are 1-based numbers, so the
//! cell at row index 3, column index 2 reads `C4`.

use crate::core::types::Position;

/// Column index for a letter, case-insensitive
pub fn letter_to_col(letter: char) -> Option<usize> {
    let lower = letter.to_ascii_lowercase();
    if lower.is_ascii_lowercase() {
        Some((lower as u8 - b'a') as usize)
    } else {
        None
    }
}

/// Upper-case letter for a column index
pub fn col_to_letter(col: usize) -> Option<char> {
    if col < 26 {
        Some((b'A' + col as u8) as char)
    } else {
        None
    }
}

/// Human label for a cell, e.g. `C4`
///
/// Columns past `Z` fall back to their 1-based number.
pub fn cell_label(position: Position) -> String {
    match col_to_letter(position.col) {
        Some(letter) => format!("{}{}", letter, position.row + 1),
        None => format!("{}:{}", position.col + 1, position.row + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_map_to_columns() {
        assert_eq!(letter_to_col('a'), Some(0));
        assert_eq!(letter_to_col('C'), Some(2));
        assert_eq!(letter_to_col('z'), Some(25));
        assert_eq!(letter_to_col('3'), None);
        assert_eq!(letter_to_col('é'), None);
    }

    #[test]
    fn test_columns_map_to_letters() {
        assert_eq!(col_to_letter(0), Some('A'));
        assert_eq!(col_to_letter(10), Some('K'));
        assert_eq!(col_to_letter(26), None);
    }

    #[test]
    fn test_cell_label() {
        assert_eq!(cell_label(Position::new(0, 0)), "A1");
        assert_eq!(cell_label(Position::new(4, 10)), "K5");
    }
}
