pub mod word;
pub mod placed_word;
pub mod grid;
pub mod generator;
pub mod puzzle;

#[cfg(test)]
mod tests {
    use self::generator::{GeneratorSettings, PuzzleGenerator};

    use super::*;

    #[test]
    fn it_works() {
        let gen = PuzzleGenerator
        {
            words: ["hello", "world", "low", "whole"].iter().map(|w| w.to_string()).collect(),
            settings: GeneratorSettings::default()
        };

        let puzzle = gen.generate().unwrap();

        assert!(!puzzle.entries().is_empty());
        for entry in puzzle.entries()
        {
            for (offset, ch) in entry.text.chars().enumerate()
            {
                let pos = match entry.direction
                {
                    word::Direction::Horizontal => (entry.position.row, entry.position.col + offset as i16),
                    word::Direction::Vertical => (entry.position.row + offset as i16, entry.position.col),
                };
                assert_eq!(puzzle.letter(pos.0, pos.1), Some(ch));
            }
        }

        println!("{}", puzzle);
        println!("{}", serde_json::to_string_pretty(&puzzle).unwrap());
    }
}
