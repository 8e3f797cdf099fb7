/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Gaussian pyramids and small fixed kernels on single channel `f32` planes
//!
//! Borders are handled by reflecting around the edge pixel without
//! repeating it, i.e `gfedcb|abcdefgh|gfedcba`
//!
//! Down-sampling blurs with the 5-tap binomial kernel `[1,4,6,4,1]/16` in
//! both directions and keeps every second row and column. Up-sampling inserts
//! zero rows and columns and blurs with the same kernel scaled by 4.

/// Binomial kernel used for both pyramid directions
const KERNEL: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];

/// A single plane of a pyramid
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub data:   Vec<f32>,
    pub width:  usize,
    pub height: usize
}

impl Plane {
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> Plane {
        debug_assert_eq!(data.len(), width * height);
        Plane {
            data,
            width,
            height
        }
    }

    pub fn zeros(width: usize, height: usize) -> Plane {
        Plane::new(vec![0.0; width * height], width, height)
    }

    /// Add `other` to this plane, element wise
    pub fn add_assign(&mut self, other: &Plane) {
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
    }

    /// Subtract `other` from this plane, element wise
    pub fn sub_assign(&mut self, other: &Plane) {
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= b;
        }
    }
}

/// Reflect an index into `0..len` without repeating the border pixel
#[inline]
pub fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    let mut i = index;

    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * len - 2 - i;
        } else {
            return i as usize;
        }
    }
}

/// Number of pyramid levels for an image, `floor(log2(min(width,height)))`
pub fn max_level(width: usize, height: usize) -> usize {
    let smallest = width.min(height);

    if smallest == 0 {
        return 0;
    }
    (usize::BITS - 1 - smallest.leading_zeros()) as usize
}

/// Blur and halve a plane
///
/// The output has dimensions `((width+1)/2,(height+1)/2)`
pub fn pyr_down(src: &Plane) -> Plane {
    let (width, height) = (src.width, src.height);
    let out_width = (width + 1) / 2;
    let out_height = (height + 1) / 2;

    // horizontal pass, every source row, every second column
    let mut scratch = vec![0.0_f32; out_width * height];

    for y in 0..height {
        let row = &src.data[y * width..(y + 1) * width];
        let out_row = &mut scratch[y * out_width..(y + 1) * out_width];

        for (x, out) in out_row.iter_mut().enumerate() {
            let center = (2 * x) as isize;
            let mut sum = 0.0;

            for (k, weight) in KERNEL.iter().enumerate() {
                sum += weight * row[reflect_101(center + k as isize - 2, width)];
            }
            *out = sum / 16.0;
        }
    }
    // vertical pass, every second row
    let mut output = vec![0.0_f32; out_width * out_height];

    for (y, out_row) in output.chunks_exact_mut(out_width).enumerate() {
        let center = (2 * y) as isize;

        for (k, weight) in KERNEL.iter().enumerate() {
            let sy = reflect_101(center + k as isize - 2, height);
            let row = &scratch[sy * out_width..(sy + 1) * out_width];

            for (out, value) in out_row.iter_mut().zip(row) {
                *out += weight * value;
            }
        }
        out_row.iter_mut().for_each(|x| *x /= 16.0);
    }
    Plane::new(output, out_width, out_height)
}

/// Up-sample a plane to `(width,height)`
///
/// `width` and `height` should be at most twice the source dimensions,
/// which is what [`pyr_down`] produces from a plane of that size
pub fn pyr_up(src: &Plane, width: usize, height: usize) -> Plane {
    let (src_width, src_height) = (src.width, src.height);

    // value of the zero-stuffed image at an up-sampled index
    let stuffed = |index: usize, len: usize| -> Option<usize> {
        if index % 2 == 0 && index / 2 < len {
            Some(index / 2)
        } else {
            None
        }
    };

    // horizontal pass on source rows
    let mut scratch = vec![0.0_f32; width * src_height];

    for y in 0..src_height {
        let row = &src.data[y * src_width..(y + 1) * src_width];
        let out_row = &mut scratch[y * width..(y + 1) * width];

        for (x, out) in out_row.iter_mut().enumerate() {
            let mut sum = 0.0;

            for (k, weight) in KERNEL.iter().enumerate() {
                let ux = reflect_101(x as isize + k as isize - 2, width);

                if let Some(sx) = stuffed(ux, src_width) {
                    sum += weight * row[sx];
                }
            }
            *out = sum / 8.0;
        }
    }
    // vertical pass
    let mut output = vec![0.0_f32; width * height];

    for (y, out_row) in output.chunks_exact_mut(width).enumerate() {
        for (k, weight) in KERNEL.iter().enumerate() {
            let uy = reflect_101(y as isize + k as isize - 2, height);

            if let Some(sy) = stuffed(uy, src_height) {
                let row = &scratch[sy * width..(sy + 1) * width];

                for (out, value) in out_row.iter_mut().zip(row) {
                    *out += weight * value;
                }
            }
        }
        out_row.iter_mut().for_each(|x| *x /= 8.0);
    }
    Plane::new(output, width, height)
}

/// Build a gaussian pyramid with `levels + 1` planes, the first one being `src`
pub fn gaussian_pyramid(src: Plane, levels: usize) -> Vec<Plane> {
    let mut pyramid = Vec::with_capacity(levels + 1);
    pyramid.push(src);

    for level in 0..levels {
        let next = pyr_down(&pyramid[level]);
        pyramid.push(next);
    }
    pyramid
}

/// Turn a gaussian pyramid into a laplacian pyramid in place
///
/// Every level except the last one becomes the difference between itself
/// and the up-sampled next level
pub fn to_laplacian_pyramid(pyramid: &mut [Plane]) {
    for level in 0..pyramid.len().saturating_sub(1) {
        let (width, height) = (pyramid[level].width, pyramid[level].height);
        let up = pyr_up(&pyramid[level + 1], width, height);
        pyramid[level].sub_assign(&up);
    }
}

/// Collapse a laplacian pyramid back to a single plane
pub fn collapse_pyramid(mut pyramid: Vec<Plane>) -> Plane {
    while pyramid.len() > 1 {
        let last = pyramid.pop().unwrap_or_else(|| Plane::zeros(0, 0));
        let target = pyramid.len() - 1;
        let (width, height) = (pyramid[target].width, pyramid[target].height);
        let up = pyr_up(&last, width, height);
        pyramid[target].add_assign(&up);
    }
    pyramid.pop().unwrap_or_else(|| Plane::zeros(0, 0))
}

/// 3x3 laplacian, `up + down + left + right - 4*center`
pub fn laplacian(src: &Plane) -> Plane {
    let (width, height) = (src.width, src.height);
    let mut output = vec![0.0_f32; width * height];

    for y in 0..height {
        let up = reflect_101(y as isize - 1, height);
        let down = reflect_101(y as isize + 1, height);

        for x in 0..width {
            let left = reflect_101(x as isize - 1, width);
            let right = reflect_101(x as isize + 1, width);

            output[y * width + x] = src.data[up * width + x]
                + src.data[down * width + x]
                + src.data[y * width + left]
                + src.data[y * width + right]
                - 4.0 * src.data[y * width + x];
        }
    }
    Plane::new(output, width, height)
}
