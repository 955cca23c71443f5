// Copyright (c) 2018-2022  Ministerio de Fomento
//                          Instituto de Ciencias de la Construcción Eduardo Torroja (IETcc-CSIC)

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

// Author(s): Rafael Villar Burke <pachi@ietcc.csic.es>,
//            Daniel Jiménez González <dani@ietcc.csic.es>,
//            Marta Sorribes Gil <msorribes@ietcc.csic.es>

// -----------------------------------------------------------------------------------
// Timeseries utilities
// -----------------------------------------------------------------------------------
//
// Missing positions in the shorter operand count as zero.

use num::{Float, Zero};

/// Elementwise sum of a list of series res[i] = s1[i] + s2[i] + ... + sj[i]
pub fn veclistsum<T: Float>(veclist: &[&[T]]) -> Vec<T> {
    let maxlen = veclist.iter().map(|s| s.len()).max().unwrap_or(0);
    (0..maxlen)
        .map(|idx| {
            veclist
                .iter()
                .fold(T::zero(), |acc, s| acc + *s.get(idx).unwrap_or(&T::zero()))
        })
        .collect()
}

/// Elementwise sum res[i] = vec1[i] + vec2[i]
pub fn vecvecsum<T: Float>(vec1: &[T], vec2: &[T]) -> Vec<T> {
    let len = vec1.len().max(vec2.len());
    (0..len)
        .map(|ii| {
            *vec1.get(ii).unwrap_or(&Zero::zero()) + *vec2.get(ii).unwrap_or(&Zero::zero())
        })
        .collect()
}

/// Elementwise difference res[i] = vec1[i] - vec2[i]
pub fn vecvecdif<T: Float>(vec1: &[T], vec2: &[T]) -> Vec<T> {
    vec1.iter()
        .enumerate()
        .map(|(ii, el)| *el - *vec2.get(ii).unwrap_or(&Zero::zero()))
        .collect()
}

/// Multiply series by scalar
pub fn veckmul<T: Float>(vec1: &[T], k: T) -> Vec<T> {
    vec1.iter().map(|el| *el * k).collect()
}

/// Sum all elements in a series
pub fn vecsum<T: Float>(vec: &[T]) -> T {
    vec.iter().fold(T::zero(), |acc, el| acc + *el)
}

/// Round to two decimals, without negative zeros
pub fn round2(value: f64) -> f64 {
    let r = (value * 100.0).round() / 100.0;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}
