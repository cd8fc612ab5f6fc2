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


use crate::error::Error;

const ASCII_0: u8 = 0x30;
const ASCII_9: u8 = 0x39;

// Converts a decimal digit into its value.
pub fn ctou32(c: u8) -> Result<u32, Error> {
    if !(ASCII_0..=ASCII_9).contains(&c) {
        return Err(Error::InvalidFormat("Invalid digit"));
    }
    Ok((c - ASCII_0) as u32)
}

// Converts a string of decimal digits into its value.
pub fn atou16(bytes: &[u8]) -> Result<u16, Error> {
    if bytes.is_empty() || bytes.len() > 5 {
        return Err(Error::InvalidFormat("Invalid number length"));
    }
    let mut n: u32 = 0;
    for &c in bytes {
        n = n * 10 + ctou32(c)?;
    }
    u16::try_from(n).map_err(|_| Error::InvalidFormat("Number too large"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits() {
        assert_eq!(ctou32(b'0').unwrap(), 0);
        assert_eq!(ctou32(b'9').unwrap(), 9);
        assert_err_pat!(ctou32(b'/'), Error::InvalidFormat(_));
        assert_err_pat!(ctou32(b':'), Error::InvalidFormat(_));
        assert_eq!(atou16(b"0").unwrap(), 0);
        assert_eq!(atou16(b"2009").unwrap(), 2009);
        assert_eq!(atou16(b"65535").unwrap(), 65535);
        assert_err_pat!(atou16(b"65536"), Error::InvalidFormat(_));
        assert_err_pat!(atou16(b""), Error::InvalidFormat(_));
        assert_err_pat!(atou16(b"1 2"), Error::InvalidFormat(_));
    }
}
