//! Scanline filters
//!
//! Each row is filtered with all five PNG filters and the cheapest one is
//! kept. `unfilter_row` is the exact inverse and is what a decoder applies.

/// PNG filter types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FilterType {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}

impl FilterType {
    pub const ALL: [FilterType; 5] = [
        FilterType::None,
        FilterType::Sub,
        FilterType::Up,
        FilterType::Average,
        FilterType::Paeth,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Sub),
            2 => Some(Self::Up),
            3 => Some(Self::Average),
            4 => Some(Self::Paeth),
            _ => None,
        }
    }
}

/// How the cost of a filtered row is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterHeuristic {
    /// Sum of |raw - predictor| using plain integer subtraction
    #[default]
    SignedDelta,
    /// Sum of the stored (wrapped) bytes read as 0..=255
    WrappedBytes,
}

/// Paeth predictor; ties prefer left, then up, then up-left
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Predictor for byte `i` of `row` under `filter`
#[inline]
fn predict(filter: FilterType, row: &[u8], prev: &[u8], i: usize, bpp: usize) -> u8 {
    let a = if i >= bpp { row[i - bpp] } else { 0 };
    let b = prev[i];
    let c = if i >= bpp { prev[i - bpp] } else { 0 };
    match filter {
        FilterType::None => 0,
        FilterType::Sub => a,
        FilterType::Up => b,
        FilterType::Average => ((a as u16 + b as u16) / 2) as u8,
        FilterType::Paeth => paeth(a, b, c),
    }
}

/// Filter `row` into `out`, returning the row's cost.
///
/// `prev` is the previous raw scanline (all zeros for the first row).
pub fn filter_row(
    filter: FilterType,
    row: &[u8],
    prev: &[u8],
    bpp: usize,
    heuristic: FilterHeuristic,
    out: &mut [u8],
) -> u64 {
    let mut cost = 0u64;
    for i in 0..row.len() {
        let raw = row[i];
        let pred = predict(filter, row, prev, i, bpp);
        let stored = raw.wrapping_sub(pred);
        out[i] = stored;
        cost += match heuristic {
            FilterHeuristic::SignedDelta => (raw as i32 - pred as i32).unsigned_abs() as u64,
            FilterHeuristic::WrappedBytes => stored as u64,
        };
    }
    cost
}

/// Filter a whole image, each row prefixed with its filter tag
pub fn filter_image(pixels: &[u8], stride: usize, bpp: usize, heuristic: FilterHeuristic) -> Vec<u8> {
    if stride == 0 {
        return Vec::new();
    }
    let height = pixels.len() / stride;
    let mut out = Vec::with_capacity(height * (stride + 1));

    let zeros = vec![0u8; stride];
    let mut best = vec![0u8; stride];
    let mut scratch = vec![0u8; stride];

    for y in 0..height {
        let row = &pixels[y * stride..(y + 1) * stride];
        let prev = if y == 0 { &zeros[..] } else { &pixels[(y - 1) * stride..y * stride] };

        let mut best_filter = FilterType::None;
        let mut best_cost = u64::MAX;
        for filter in FilterType::ALL {
            let cost = filter_row(filter, row, prev, bpp, heuristic, &mut scratch);
            // Strictly less: ties keep the lower tag
            if cost < best_cost {
                best_cost = cost;
                best_filter = filter;
                std::mem::swap(&mut best, &mut scratch);
            }
        }

        out.push(best_filter as u8);
        out.extend_from_slice(&best);
    }

    out
}

/// Reverse a filter in place. `prev` is the previous reconstructed row.
pub fn unfilter_row(filter: FilterType, row: &mut [u8], prev: &[u8], bpp: usize) {
    for i in 0..row.len() {
        let pred = predict(filter, row, prev, i, bpp);
        row[i] = row[i].wrapping_add(pred);
    }
}
