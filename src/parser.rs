use std::collections::HashSet;

use crate::endian::Endian;
use crate::ifd::{IfdStructure, PreservedBytes};
use crate::Error;

/// Limits of the directory walker.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// The maximum number of directories in one chain.
    pub max_ifds: usize,
    /// The maximum nesting of sub-IFDs and makernotes.
    pub max_depth: usize,
    /// Whether makernotes are handed to the vendor decoders.
    pub decode_makernotes: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_ifds: 8,
            max_depth: 6,
            decode_makernotes: true,
        }
    }
}

#[derive(Debug)]
pub struct Parser {
    pub options: Options,
    pub structure: IfdStructure,
    pub byte_order: Endian,
    // Make of the 0th IFD, for makernote dispatch.
    pub(crate) make: Option<String>,
    pub(crate) depth: usize,
    // Absolute positions of the directories read so far.
    pub(crate) visited: HashSet<usize>,
    // Tags that point to nested directories inside the current makernote.
    pub(crate) sub_ifd_tags: &'static [u16],
}

pub trait Parse {
    fn parse(&mut self, data: &[u8]) -> Result<(), Error>;
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Parser {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            structure: IfdStructure::new(),
            byte_order: Endian::Big,
            make: None,
            depth: 0,
            visited: HashSet::new(),
            sub_ifd_tags: &[],
        }
    }
}

/// An offset space.  Offsets read in its directories are relative to
/// `base`, and its multi-byte numbers use `order`.
#[derive(Debug)]
pub struct Family {
    pub base: usize,
    pub order: Endian,
    pub coverage: Coverage,
}

impl Family {
    pub fn new(base: usize, order: Endian) -> Self {
        Self {
            base,
            order,
            coverage: Coverage::default(),
        }
    }
}

/// Byte ranges (absolute positions in the buffer) that the walker has
/// accounted for.
#[derive(Debug, Default)]
pub struct Coverage {
    ranges: Vec<(usize, usize)>,
}

impl Coverage {
    pub fn add(&mut self, start: usize, len: usize) {
        if len > 0 {
            self.ranges.push((start, start.saturating_add(len)));
        }
    }

    /// Returns the parts of `data[start..end]` that no range covers, with
    /// offsets relative to `base`.
    ///
    /// A single NUL at an odd offset right before a covered range is
    /// word-alignment padding and is not reported.
    pub fn gaps(&self, data: &[u8], start: usize, end: usize, base: usize) -> Vec<PreservedBytes> {
        let end = end.min(data.len());
        let mut ranges: Vec<(usize, usize)> = self
            .ranges
            .iter()
            .map(|&(s, e)| (s.max(start), e.min(end)))
            .filter(|&(s, e)| s < e)
            .collect();
        ranges.sort_unstable();

        let mut gaps = Vec::new();
        let mut pos = start;
        for (s, e) in ranges {
            if s > pos {
                push_gap(&mut gaps, data, pos, s, base, true);
            }
            pos = pos.max(e);
        }
        if pos < end {
            push_gap(&mut gaps, data, pos, end, base, false);
        }
        gaps
    }
}

fn push_gap(
    gaps: &mut Vec<PreservedBytes>,
    data: &[u8],
    start: usize,
    end: usize,
    base: usize,
    followed: bool,
) {
    let offset = start.saturating_sub(base);
    if followed && end - start == 1 && data[start] == 0 && offset % 2 == 1 {
        return;
    }
    gaps.push(PreservedBytes {
        offset: offset as u32,
        bytes: data[start..end].to_vec(),
    });
}
