//! One-shot signature locator.
//!
//! Runs once before polling starts. Any failure is final: the caller gets
//! [`TargetAddress::NotFound`] and detection stays disabled until the engine
//! is rebuilt.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::process::pattern::find_matches;
use crate::process::{ByteBuffer, CodeRegion, ReadMemory};

use super::{CodeSignature, format_pattern};

/// Bytes read per scan step (1 MiB).
pub const CODE_SCAN_CHUNK_SIZE: usize = 0x10_0000;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("invalid signature: {0}")]
    InvalidSignature(#[source] Error),

    #[error("failed to read code region at {address:#x}: {source}")]
    ScanFailed {
        address: u64,
        #[source]
        source: Error,
    },

    #[error("pattern not found ({pattern})")]
    NotFound { pattern: String },

    #[error("pattern is not unique: {count} matches, first at {first:#x}")]
    Ambiguous { count: usize, first: u64 },

    #[error("could not resolve reference at {address:#x}: {reason}")]
    Unresolvable { address: u64, reason: String },
}

/// Result of the startup locate step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetAddress {
    Resolved(u64),
    NotFound,
}

impl TargetAddress {
    pub fn address(self) -> Option<u64> {
        match self {
            TargetAddress::Resolved(address) => Some(address),
            TargetAddress::NotFound => None,
        }
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, TargetAddress::Resolved(_))
    }
}

impl From<Option<u64>> for TargetAddress {
    fn from(value: Option<u64>) -> Self {
        value.map_or(TargetAddress::NotFound, TargetAddress::Resolved)
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetAddress::Resolved(address) => write!(f, "{:#X}", address),
            TargetAddress::NotFound => write!(f, "not found"),
        }
    }
}

/// Locate `signature` in `region`, logging the reason on failure.
pub fn locate<R: ReadMemory>(
    reader: &R,
    region: CodeRegion,
    signature: &CodeSignature,
) -> TargetAddress {
    match resolve_unique(reader, region, signature) {
        Ok(address) => {
            info!("Located {} at {:#X}", signature.pattern, address);
            TargetAddress::Resolved(address)
        }
        Err(e) => {
            warn!("Signature locate failed: {}", e);
            TargetAddress::NotFound
        }
    }
}

/// Scan `region` for exactly one match of `signature` and resolve the
/// RIP-relative reference it contains.
pub fn resolve_unique<R: ReadMemory>(
    reader: &R,
    region: CodeRegion,
    signature: &CodeSignature,
) -> Result<u64, LocateError> {
    let pattern = signature
        .pattern_bytes()
        .map_err(LocateError::InvalidSignature)?;

    let matches = scan_region(reader, region, &pattern)?;
    let match_addr = match matches.as_slice() {
        [] => {
            return Err(LocateError::NotFound {
                pattern: format_pattern(&pattern),
            });
        }
        [single] => *single,
        [first, ..] => {
            return Err(LocateError::Ambiguous {
                count: matches.len(),
                first: *first,
            });
        }
    };

    debug!("Signature matched at {:#X}", match_addr);
    resolve_reference(reader, region, signature, match_addr)
}

fn resolve_reference<R: ReadMemory>(
    reader: &R,
    region: CodeRegion,
    signature: &CodeSignature,
    match_addr: u64,
) -> Result<u64, LocateError> {
    let instr_addr = match_addr + signature.instr_offset as u64;
    let disp_addr = instr_addr + signature.disp_offset as u64;

    let disp_bytes = reader
        .read_bytes(disp_addr, 4)
        .map_err(|e| LocateError::Unresolvable {
            address: disp_addr,
            reason: e.to_string(),
        })?;
    let disp = ByteBuffer::new(&disp_bytes)
        .read_i32_at(0)
        .map_err(|e| LocateError::Unresolvable {
            address: disp_addr,
            reason: e.to_string(),
        })?;

    let next_ip = instr_addr + signature.instr_len as u64;
    let mut target = next_ip.wrapping_add_signed(disp as i64);

    if !region.contains(target) {
        return Err(LocateError::Unresolvable {
            address: target,
            reason: format!(
                "reference outside module image {:#X}..{:#X}",
                region.base,
                region.end()
            ),
        });
    }

    if signature.deref {
        target = reader
            .read_u64(target)
            .map_err(|e| LocateError::Unresolvable {
                address: target,
                reason: e.to_string(),
            })?;
    }

    target = target.wrapping_add_signed(signature.addend);

    if target == 0 {
        return Err(LocateError::Unresolvable {
            address: next_ip,
            reason: "reference resolves to null".to_string(),
        });
    }

    Ok(target)
}

/// Scan the region chunk by chunk, carrying a pattern-length tail between
/// chunks so matches that straddle a boundary are found.
fn scan_region<R: ReadMemory>(
    reader: &R,
    region: CodeRegion,
    pattern: &[Option<u8>],
) -> Result<Vec<u64>, LocateError> {
    let mut results: Vec<u64> = Vec::new();
    let mut offset: usize = 0;
    let mut tail: Vec<u8> = Vec::new();

    while offset < region.size {
        let read_size = (region.size - offset).min(CODE_SCAN_CHUNK_SIZE);
        let addr = region.base + offset as u64;

        let chunk = match reader.read_bytes(addr, read_size) {
            Ok(bytes) => bytes,
            Err(e) if offset == 0 => {
                return Err(LocateError::ScanFailed {
                    address: addr,
                    source: e,
                });
            }
            Err(e) => {
                debug!(
                    "Code scan stopped at {:#x} (scanned {:#x} bytes): {}",
                    addr, offset, e
                );
                break;
            }
        };

        let mut data = Vec::with_capacity(tail.len() + chunk.len());
        data.extend_from_slice(&tail);
        data.extend_from_slice(&chunk);

        let data_base = addr - tail.len() as u64;
        results.extend(
            find_matches(&data, pattern)
                .into_iter()
                .map(|pos| data_base + pos as u64),
        );

        let keep = pattern.len() - 1;
        tail = data[data.len().saturating_sub(keep)..].to_vec();
        offset += read_size;
    }

    results.sort_unstable();
    results.dedup();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockMemoryBuilder;

    fn lea_signature() -> CodeSignature {
        CodeSignature {
            pattern: "48 8D 0D ?? ?? ?? ?? E8".to_string(),
            instr_offset: 0,
            disp_offset: 3,
            instr_len: 7,
            deref: false,
            addend: 0,
        }
    }

    #[test]
    fn test_resolves_rip_relative_reference() {
        // lea rcx, [rip+0x100] at base+0x10 -> base+0x17+0x100
        let reader = MockMemoryBuilder::new()
            .with_size(0x400)
            .write_bytes(0x10, &[0x48, 0x8D, 0x0D])
            .write_i32(0x13, 0x100)
            .write_bytes(0x17, &[0xE8])
            .build();

        let address = resolve_unique(&reader, reader.code_region(), &lea_signature()).unwrap();
        assert_eq!(address, 0x1000 + 0x17 + 0x100);
    }

    #[test]
    fn test_negative_displacement() {
        let reader = MockMemoryBuilder::new()
            .with_size(0x400)
            .write_bytes(0x300, &[0x48, 0x8D, 0x0D])
            .write_i32(0x303, -0x200)
            .write_bytes(0x307, &[0xE8])
            .build();

        let address = resolve_unique(&reader, reader.code_region(), &lea_signature()).unwrap();
        assert_eq!(address, 0x1000 + 0x307 - 0x200);
    }

    #[test]
    fn test_not_found() {
        let reader = MockMemoryBuilder::new().with_size(0x100).build();

        let result = resolve_unique(&reader, reader.code_region(), &lea_signature());
        assert!(matches!(result, Err(LocateError::NotFound { .. })));
        assert_eq!(
            locate(&reader, reader.code_region(), &lea_signature()),
            TargetAddress::NotFound
        );
    }

    #[test]
    fn test_ambiguous_match_is_not_found() {
        let reader = MockMemoryBuilder::new()
            .with_size(0x100)
            .write_bytes(0x10, &[0x48, 0x8D, 0x0D, 0x10, 0, 0, 0, 0xE8])
            .write_bytes(0x40, &[0x48, 0x8D, 0x0D, 0x10, 0, 0, 0, 0xE8])
            .build();

        let result = resolve_unique(&reader, reader.code_region(), &lea_signature());
        assert!(matches!(
            result,
            Err(LocateError::Ambiguous { count: 2, first: 0x1010 })
        ));
    }

    #[test]
    fn test_reference_outside_image_is_unresolvable() {
        let reader = MockMemoryBuilder::new()
            .with_size(0x100)
            .write_bytes(0x10, &[0x48, 0x8D, 0x0D])
            .write_i32(0x13, 0x7FFF_0000)
            .write_bytes(0x17, &[0xE8])
            .build();

        let result = resolve_unique(&reader, reader.code_region(), &lea_signature());
        assert!(matches!(result, Err(LocateError::Unresolvable { .. })));
    }

    #[test]
    fn test_deref_and_addend() {
        let mut signature = lea_signature();
        signature.deref = true;
        signature.addend = 0x8;

        let reader = MockMemoryBuilder::new()
            .with_size(0x200)
            .write_bytes(0x10, &[0x48, 0x8D, 0x0D])
            .write_i32(0x13, 0x100 - 0x17)
            .write_bytes(0x17, &[0xE8])
            .write_u64(0x100, 0x2000_0000)
            .build();

        let address = resolve_unique(&reader, reader.code_region(), &signature).unwrap();
        assert_eq!(address, 0x2000_0008);
    }

    #[test]
    fn test_null_deref_is_unresolvable() {
        let mut signature = lea_signature();
        signature.deref = true;

        let reader = MockMemoryBuilder::new()
            .with_size(0x200)
            .write_bytes(0x10, &[0x48, 0x8D, 0x0D])
            .write_i32(0x13, 0x100 - 0x17)
            .write_bytes(0x17, &[0xE8])
            .build();

        let result = resolve_unique(&reader, reader.code_region(), &signature);
        assert!(matches!(result, Err(LocateError::Unresolvable { .. })));
    }

    #[test]
    fn test_match_straddling_chunk_boundary() {
        let start = CODE_SCAN_CHUNK_SIZE - 3;
        let reader = MockMemoryBuilder::new()
            .with_size(CODE_SCAN_CHUNK_SIZE + 0x100)
            .write_bytes(start, &[0x48, 0x8D, 0x0D])
            .write_i32(start + 3, 0x20)
            .write_bytes(start + 7, &[0xE8])
            .build();

        let address = resolve_unique(&reader, reader.code_region(), &lea_signature()).unwrap();
        assert_eq!(address, 0x1000 + (start + 7) as u64 + 0x20);
    }

    #[test]
    fn test_unreadable_region_fails_scan() {
        let reader = MockMemoryBuilder::new().with_size(0x10).build();
        let region = CodeRegion::new(0x9000, 0x100);

        let result = resolve_unique(&reader, region, &lea_signature());
        assert!(matches!(result, Err(LocateError::ScanFailed { .. })));
    }

    #[test]
    fn test_target_address_display() {
        assert_eq!(TargetAddress::Resolved(0x1A2B).to_string(), "0x1A2B");
        assert_eq!(TargetAddress::NotFound.to_string(), "not found");
        assert_eq!(TargetAddress::from(None), TargetAddress::NotFound);
        assert_eq!(TargetAddress::from(Some(4)).address(), Some(4));
    }
}
