//! Message chain - an ordered sequence of segments forming one chat message

use super::MessageSegment;

/// An ordered list of message segments
///
/// Segment order is render order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageChain {
    segments: Vec<MessageSegment>,
}

impl MessageChain {
    /// Create an empty chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain holding a single text segment
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new().add_text(text)
    }

    /// Append a segment
    #[must_use]
    pub fn add(mut self, segment: MessageSegment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Append a text segment
    #[must_use]
    pub fn add_text(self, text: impl Into<String>) -> Self {
        self.add(MessageSegment::text(text))
    }

    /// Append a reply segment
    #[must_use]
    pub fn add_reply(self, target_message_id: i32) -> Self {
        self.add(MessageSegment::reply(target_message_id))
    }

    /// Insert a segment at the front of the chain
    #[must_use]
    pub fn prepend(mut self, segment: MessageSegment) -> Self {
        self.segments.insert(0, segment);
        self
    }

    /// Get the first segment
    #[must_use]
    pub fn first(&self) -> Option<&MessageSegment> {
        self.segments.first()
    }

    /// Get all segments in order
    #[must_use]
    pub fn segments(&self) -> &[MessageSegment] {
        &self.segments
    }

    /// Number of segments
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the chain has no segments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Concatenate the content of every text segment
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(MessageSegment::as_text)
            .collect()
    }

    /// Iterate over the segments
    pub fn iter(&self) -> std::slice::Iter<'_, MessageSegment> {
        self.segments.iter()
    }
}

impl From<Vec<MessageSegment>> for MessageChain {
    fn from(segments: Vec<MessageSegment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<MessageSegment> for MessageChain {
    fn from_iter<I: IntoIterator<Item = MessageSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MessageChain {
    type Item = MessageSegment;
    type IntoIter = std::vec::IntoIter<MessageSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageChain {
    type Item = &'a MessageSegment;
    type IntoIter = std::slice::Iter<'a, MessageSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_preserves_insertion_order() {
        let chain = MessageChain::new()
            .add_text("a")
            .add_reply(3)
            .add_text("b");

        assert_eq!(
            chain.segments(),
            &[
                MessageSegment::text("a"),
                MessageSegment::reply(3),
                MessageSegment::text("b"),
            ]
        );
    }

    #[test]
    fn test_prepend() {
        let chain = MessageChain::from_text("hello").prepend(MessageSegment::reply(9));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.first(), Some(&MessageSegment::reply(9)));
    }

    #[test]
    fn test_plain_text_skips_replies() {
        let chain = MessageChain::new()
            .add_reply(1)
            .add_text("foo ")
            .add_text("bar");

        assert_eq!(chain.plain_text(), "foo bar");
    }

    #[test]
    fn test_empty_chain() {
        let chain = MessageChain::new();
        assert!(chain.is_empty());
        assert!(chain.first().is_none());
    }
}
