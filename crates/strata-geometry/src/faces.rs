//! Topology-prefixed face decoding.
//!
//! A face buffer is a run of records, each a flag followed by the vertex
//! indices of one face:
//!
//! ```text
//! 0, a, b, c        triangle (a, b, c)
//! 1, a, b, c, d     quad, split into (a, b, c) and (a, c, d)
//! ```
//!
//! Any other flag is rejected; there is no fallback guess.

use crate::error::{GeometryError, GeometryResult};

/// Face kinds understood by [`decode_faces`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceKind {
    Triangle,
    Quad,
}

impl FaceKind {
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            0 => Some(Self::Triangle),
            1 => Some(Self::Quad),
            _ => None,
        }
    }

    /// Number of vertex indices following the flag.
    pub fn arity(self) -> usize {
        match self {
            Self::Triangle => 3,
            Self::Quad => 4,
        }
    }
}

/// Decode a face buffer into triangle index triples.
///
/// Every index is checked against `vertex_count`.
pub fn decode_faces(faces: &[i64], vertex_count: usize) -> GeometryResult<Vec<u32>> {
    let mut indices = Vec::with_capacity(faces.len());
    let mut offset = 0;
    while offset < faces.len() {
        let flag = faces[offset];
        let kind = FaceKind::from_flag(flag)
            .ok_or(GeometryError::UnsupportedFaceTopology { flag, offset })?;

        let start = offset + 1;
        let end = start + kind.arity();
        if end > faces.len() {
            return Err(GeometryError::TruncatedFace {
                offset,
                needed: kind.arity(),
                available: faces.len() - start,
            });
        }

        let mut corners = [0u32; 4];
        for (slot, &raw) in corners.iter_mut().zip(&faces[start..end]) {
            *slot = checked_index(raw, vertex_count)?;
        }
        match kind {
            FaceKind::Triangle => indices.extend_from_slice(&corners[..3]),
            FaceKind::Quad => {
                let [a, b, c, d] = corners;
                indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }
        offset = end;
    }
    Ok(indices)
}

fn checked_index(raw: i64, vertex_count: usize) -> GeometryResult<u32> {
    match u32::try_from(raw) {
        Ok(index) if (index as usize) < vertex_count => Ok(index),
        _ => Err(GeometryError::IndexOutOfRange {
            index: raw,
            vertex_count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle() {
        assert_eq!(decode_faces(&[0, 0, 1, 2], 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn quad_splits_on_first_third_diagonal() {
        assert_eq!(
            decode_faces(&[1, 0, 1, 2, 3], 4).unwrap(),
            vec![0, 1, 2, 0, 2, 3]
        );
    }

    #[test]
    fn mixed_records() {
        let faces = [0, 0, 1, 2, 1, 2, 3, 4, 5];
        assert_eq!(
            decode_faces(&faces, 6).unwrap(),
            vec![0, 1, 2, 2, 3, 4, 2, 4, 5]
        );
    }

    #[test]
    fn empty_buffer_has_no_triangles() {
        assert!(decode_faces(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert_eq!(
            decode_faces(&[2, 0, 1, 2, 3], 4),
            Err(GeometryError::UnsupportedFaceTopology { flag: 2, offset: 0 })
        );
    }

    #[test]
    fn unknown_flag_after_valid_face_reports_offset() {
        assert_eq!(
            decode_faces(&[0, 0, 1, 2, 7], 3),
            Err(GeometryError::UnsupportedFaceTopology { flag: 7, offset: 4 })
        );
    }

    #[test]
    fn truncated_quad_is_rejected() {
        assert_eq!(
            decode_faces(&[1, 0, 1], 4),
            Err(GeometryError::TruncatedFace {
                offset: 0,
                needed: 4,
                available: 2
            })
        );
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert_eq!(
            decode_faces(&[0, 0, 1, 3], 3),
            Err(GeometryError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );
        assert!(decode_faces(&[0, -1, 0, 1], 3).is_err());
    }

    #[test]
    fn face_kind_arity() {
        assert_eq!(FaceKind::from_flag(0).map(FaceKind::arity), Some(3));
        assert_eq!(FaceKind::from_flag(1).map(FaceKind::arity), Some(4));
        assert_eq!(FaceKind::from_flag(5), None);
    }
}
