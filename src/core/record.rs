pub trait SequenceRecord {
    fn seq(&self) -> &[u8];
}

#[derive(Clone, Copy, Debug)]
pub struct RecordView<'a> {
    pub id: &'a [u8],
    pub seq: &'a [u8],
    pub qual: Option<&'a [u8]>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnedRecord {
    pub id: Vec<u8>,
    pub seq: Vec<u8>,
    pub qual: Option<Vec<u8>>,
}

impl OwnedRecord {
    pub fn new(id: impl Into<Vec<u8>>, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            seq: seq.into(),
            qual: None,
        }
    }

    pub fn from_view(view: RecordView<'_>) -> Self {
        Self {
            id: view.id.to_vec(),
            seq: view.seq.to_vec(),
            qual: view.qual.map(<[u8]>::to_vec),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.id.len() + self.seq.len() + self.qual.as_ref().map_or(0, Vec::len)
    }

    pub fn as_view(&self) -> RecordView<'_> {
        RecordView {
            id: &self.id,
            seq: &self.seq,
            qual: self.qual.as_deref(),
        }
    }

    /// Identifier up to the first whitespace, lossily decoded.
    pub fn name(&self) -> String {
        let end = self
            .id
            .iter()
            .position(|b| b.is_ascii_whitespace())
            .unwrap_or(self.id.len());
        String::from_utf8_lossy(&self.id[..end]).into_owned()
    }
}

impl SequenceRecord for RecordView<'_> {
    fn seq(&self) -> &[u8] {
        self.seq
    }
}

impl SequenceRecord for OwnedRecord {
    fn seq(&self) -> &[u8] {
        &self.seq
    }
}

impl SequenceRecord for &str {
    fn seq(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl SequenceRecord for String {
    fn seq(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl SequenceRecord for &[u8] {
    fn seq(&self) -> &[u8] {
        self
    }
}

impl SequenceRecord for Vec<u8> {
    fn seq(&self) -> &[u8] {
        self
    }
}

impl<R: SequenceRecord + ?Sized> SequenceRecord for Box<R> {
    fn seq(&self) -> &[u8] {
        (**self).seq()
    }
}
