/// Efficiently find the index of the start of the next UTF-8 character
pub fn get_next_char_index(input: &str, mut index: usize) -> Option<usize> {
    while index < input.len() {
        index += 1;
        if input.is_char_boundary(index) {
            return Some(index);
        }
    }
    None
}

/// Converts UTF-8 byte offsets into character offsets. Offsets are expected in
/// ascending order (as matches are found), which keeps each conversion
/// proportional to the distance from the previous one.
pub struct CharIndexer<'a> {
    content: &'a str,
    byte_index: usize,
    char_index: usize,
}

impl<'a> CharIndexer<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            byte_index: 0,
            char_index: 0,
        }
    }

    pub fn char_index(&mut self, byte_index: usize) -> usize {
        if byte_index < self.byte_index {
            // went backwards, start counting over
            self.byte_index = 0;
            self.char_index = 0;
        }
        self.char_index += self.content[self.byte_index..byte_index].chars().count();
        self.byte_index = byte_index;
        self.char_index
    }
}
