/// Tracks just enough regex syntax to know whether a character is live syntax:
/// whether the previous character was an unescaped `\`, and whether we are
/// inside a `[...]` character class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatternLexer {
    in_character_class: bool,
    escape_next: bool,
}

impl PatternLexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one character. Returns true if the character is live syntax outside
    /// of a character class, which is the only place a `(` or `)` opens or
    /// closes a group.
    pub fn advance(&mut self, c: char) -> bool {
        if self.escape_next {
            self.escape_next = false;
            return false;
        }
        match c {
            '\\' => {
                self.escape_next = true;
                false
            }
            '[' if !self.in_character_class => {
                self.in_character_class = true;
                false
            }
            ']' if self.in_character_class => {
                self.in_character_class = false;
                false
            }
            _ => !self.in_character_class,
        }
    }

    pub fn in_character_class(&self) -> bool {
        self.in_character_class
    }

    /// True right after a backslash, when the next character is literal.
    pub fn escape_pending(&self) -> bool {
        self.escape_next
    }
}
