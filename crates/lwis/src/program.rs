use crate::error::{Error, Fault, Result};
use crate::isa::{Instruction, Word};

/// An immutable sequence of instruction words. Execution halts when the
/// program counter reaches `len()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    words: Vec<Word>,
}

impl Program {
    pub fn new(words: Vec<Word>) -> Result<Self> {
        // The halting address itself must be reachable by the program counter.
        if u32::try_from(words.len()).is_err() {
            return Err(Error::ProgramTooLarge(words.len()));
        }
        Ok(Self { words })
    }

    /// Parse a program image written as one integer per line.
    ///
    /// Format:
    /// ```text
    /// # Comments start with #
    /// 33751043        # decimal
    /// 0x0203_0003     # hex, underscores allowed
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut words = Vec::new();

        for (line_num, line) in text.lines().enumerate() {
            let content = line.split_once('#').map_or(line, |(code, _)| code).trim();
            if content.is_empty() {
                continue;
            }

            let word = parse_word(content).ok_or_else(|| Error::InvalidWord {
                line: line_num + 1,
                text: content.to_string(),
            })?;
            words.push(word);
        }

        Self::new(words)
    }

    /// Encode a sequence of instructions into a program image.
    pub fn from_instructions(instructions: &[Instruction]) -> Result<Self> {
        Self::new(instructions.iter().map(Instruction::encode).collect())
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn fetch(&self, pc: u32) -> Option<Word> {
        self.words.get(pc as usize).copied()
    }

    /// Decode every word, keeping undecodable ones as faults.
    pub fn disassemble(
        &self,
    ) -> impl Iterator<Item = (usize, Word, std::result::Result<Instruction, Fault>)> + '_ {
        self.words
            .iter()
            .enumerate()
            .map(|(index, &word)| (index, word, Instruction::decode(word)))
    }
}

fn parse_word(text: &str) -> Option<Word> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Word::from_str_radix(hex, 16).ok()
    } else {
        digits.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::Operation;

    #[test]
    fn test_parse_decimal_and_hex() {
        let program = Program::parse("33751043\n0x0302060002\n0X50001\n").unwrap();
        assert_eq!(program.words(), &[0x0203_0003, 0x03_0206_0002, 0x05_0001]);
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let text = "
            # load r2 = 5
            0x0502_0003   # li

            0x0100 # ret
        ";
        let program = Program::parse(text).unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(program.fetch(1), Some(0x0100));
        assert_eq!(program.fetch(2), None);
    }

    #[test]
    fn test_parse_reports_line() {
        let err = Program::parse("1\n\nbogus\n").unwrap_err();
        match err {
            Error::InvalidWord { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "bogus");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_negative_and_oversized() {
        assert!(Program::parse("-1").is_err());
        assert!(Program::parse("0x1_0000_0000_0000_0000").is_err());
    }

    #[test]
    fn test_collect_instructions() {
        let program = Program::from_instructions(&[
            Instruction::new(Operation::LoadImm, &[2, 5]),
            Instruction::new(Operation::Print, &[2]),
        ])
        .unwrap();
        assert_eq!(program.words(), &[0x0502_0003, 0x02_0001]);
    }

    #[test]
    fn test_disassemble() {
        let program = Program::new(vec![0x0100, 0x09]).unwrap();
        let listing: Vec<_> = program.disassemble().collect();
        assert_eq!(listing[0].2, Ok(Instruction::new(Operation::Return, &[])));
        assert_eq!(
            listing[1].2,
            Err(Fault::UnknownOperation {
                family: 9,
                opcode: 0
            })
        );
    }
}
