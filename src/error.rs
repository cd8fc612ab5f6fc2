//
// Copyright (c) 2016 KAMADA Ken'ichi.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions
// are met:
// 1. Redistributions of source code must retain the above copyright
//    notice, this list of conditions and the following disclaimer.
// 2. Redistributions in binary form must reproduce the above copyright
//    notice, this list of conditions and the following disclaimer in the
//    documentation and/or other materials provided with the distribution.
//
// THIS SOFTWARE IS PROVIDED BY THE AUTHOR AND CONTRIBUTORS ``AS IS'' AND
// ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED.  IN NO EVENT SHALL THE AUTHOR OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS
// OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION)
// HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT
// LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY
// OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF
// SUCH DAMAGE.
//


use thiserror::Error;

/// An error returned when reading or rendering directories.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input is not a TIFF region (bad byte order mark, bad magic,
    /// truncated header).
    #[error("invalid format: {0}")]
    InvalidFormat(&'static str),
    /// A directory is inconsistent with the buffer bounds.  Inside a
    /// read this is absorbed per entry and only surfaces for the
    /// first directory of a region.
    #[error("malformed directory at offset {offset}: {reason}")]
    MalformedDirectory { offset: usize, reason: &'static str },
    /// A typed accessor was called on an entry of another type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// The value is blank (e.g. an all-space DateTime).
    #[error("blank value: {0}")]
    BlankValue(&'static str),
    /// A structure reached the renderer with a size that cannot be
    /// encoded.  Indicates a bug in the caller or in this library.
    #[error("render invariant violated: {0}")]
    RenderInvariantViolation(&'static str),
}

impl Error {
    pub(crate) fn malformed(offset: usize, reason: &'static str) -> Error {
        Error::MalformedDirectory { offset, reason }
    }
}
