// Copyright 2026 The MWEB Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Single-value, 64-bit range proof with an inner-product argument (§4.5).
//!
//! The prover and verifier below implement the logarithmic generator-folding
//! variant of the protocol (halving the generator vectors every round); the
//! reference implementation additionally supports a periodic-folding
//! optimization for batch verification which this crate does not reproduce
//! (see DESIGN.md — it is a prover-side optimization, not a protocol
//! difference, and does not change what a proof attests to).

use crate::error::{Error, Result};
use crate::generators::{get_generators, h};
use crate::hash::{scalar_chacha20, update_commit};
use crate::point::Point;
use crate::scalar::Scalar;
use sha2::{Digest, Sha256};

const NBITS: usize = 64;
const IP_AB_SCALARS: usize = 4;

/// Fixed total size of a single-value 64-bit range proof, per §4.5.
pub const PROOF_SIZE: usize = 675;

/// `InnerProductProofLength(n)`: the serialized size of the inner-product
/// portion of the proof for a vector of length `n` (§4.5.2).
pub fn inner_product_proof_length(n: usize) -> usize {
	if n < IP_AB_SCALARS / 2 {
		return 32 * (1 + 2 * n);
	}
	let log = (n as f64).log2();
	let popcount = (n as u32).count_ones() as usize;
	let extra_rounds = (2.0 * n as f64 / IP_AB_SCALARS as f64).log2().floor() as usize;
	let rounds = popcount.saturating_sub(1) + extra_rounds;
	32 * (1 + 2 * rounds + IP_AB_SCALARS) + (2 * log as usize + 7) / 8
}

pub struct ProveInputs<'a> {
	pub value: u64,
	pub blind: Scalar,
	pub private_nonce: [u8; 32],
	pub rewind_nonce: [u8; 32],
	pub proof_message: [u8; 20],
	pub extra_data: &'a [u8],
}

fn one() -> Scalar {
	let mut b = [0u8; 32];
	b[31] = 1;
	Scalar::from_bytes(&b).expect("1 < n")
}

fn two() -> Scalar {
	one().add(&one())
}

fn value_be(v: u64) -> [u8; 32] {
	let mut out = [0u8; 32];
	out[24..32].copy_from_slice(&v.to_be_bytes());
	out
}

fn mix_extra_data(commit: &[u8; 32], extra: &[u8]) -> [u8; 32] {
	let mut h = Sha256::new();
	h.update(commit);
	h.update(extra);
	h.finalize().into()
}

fn add_vec(a: &[Scalar], b: &[Scalar]) -> Vec<Scalar> {
	a.iter().zip(b).map(|(x, y)| x.add(y)).collect()
}

fn sub_vec(a: &[Scalar], b: &[Scalar]) -> Vec<Scalar> {
	a.iter().zip(b).map(|(x, y)| x.sub(y)).collect()
}

fn inner_product(a: &[Scalar], b: &[Scalar]) -> Scalar {
	a.iter()
		.zip(b)
		.fold(Scalar::ZERO, |acc, (x, y)| acc.add(&x.mul(y)))
}

/// Per-bit linear polynomials `l_j(x) = (bit_j - z) + sl_j*x` and
/// `r_j(x) = y^j*((1-bit_j)*(-1)+z+sr_j*x) + z^2*2^j`, returning the
/// constant/linear coefficient vectors and `t0 = <L(0), R(0)>`.
struct LrPolynomial {
	l0: Vec<Scalar>,
	l1: Vec<Scalar>,
	r0: Vec<Scalar>,
	r1: Vec<Scalar>,
	t0: Scalar,
}

fn lr_polynomial(bits: &[bool], sl: &[Scalar], sr: &[Scalar], y: &Scalar, z: &Scalar) -> LrPolynomial {
	let neg_one = one().neg();
	let mut l0 = Vec::with_capacity(NBITS);
	let mut l1 = Vec::with_capacity(NBITS);
	let mut r0 = Vec::with_capacity(NBITS);
	let mut r1 = Vec::with_capacity(NBITS);

	let mut yn = one();
	let mut z22n = z.square();
	for j in 0..NBITS {
		let bit = if bits[j] { one() } else { Scalar::ZERO };
		l0.push(bit.sub(z));
		l1.push(sl[j]);

		let one_minus_bit_neg = if bits[j] { Scalar::ZERO } else { neg_one };
		let inner = one_minus_bit_neg.add(z);
		r0.push(yn.mul(&inner).add(&z22n));
		r1.push(yn.mul(&sr[j]));

		yn = yn.mul(y);
		z22n = z22n.mul(&two());
	}

	let t0 = inner_product(&l0, &r0);
	LrPolynomial { l0, l1, r0, r1, t0 }
}

/// `t1 = (A'-B')/2`, `t2 = -(-B'+t0)+t1` where `A' = <L(1),R(1)>`,
/// `B' = <L(-1),R(-1)>`.
fn t1_t2(poly: &LrPolynomial) -> (Scalar, Scalar) {
	let a_eval = inner_product(&add_vec(&poly.l0, &poly.l1), &add_vec(&poly.r0, &poly.r1));
	let b_eval = inner_product(&sub_vec(&poly.l0, &poly.l1), &sub_vec(&poly.r0, &poly.r1));
	let two_inv = two().invert().expect("2 is invertible mod n");
	let t1 = a_eval.sub(&b_eval).mul(&two_inv);
	let t2 = b_eval.neg().add(&poly.t0).neg().add(&t1);
	(t1, t2)
}

/// Build a range proof attesting that `commit(value, blind)` hides a value
/// in `[0, 2^64)`.
pub fn prove(inputs: &ProveInputs) -> Result<[u8; PROOF_SIZE]> {
	let generators = get_generators(2 * NBITS);
	let (g_gens, h_gens) = generators.split_at(NBITS);

	let p = h()
		.mul(&Scalar::reduce_from_bytes(&value_be(inputs.value)))
		.add(&Point::generator().mul(&inputs.blind));

	let mut commit = update_commit(&[0u8; 32], &p, &h());
	commit = mix_extra_data(&commit, inputs.extra_data);

	let (mut alpha, rho) = scalar_chacha20(&inputs.rewind_nonce, 0);
	let (tau1, tau2) = scalar_chacha20(&inputs.private_nonce, 1);

	// Encrypt `value || proofMessage` into alpha so the rewind-nonce holder
	// can later recover both from `-mu`.
	let mut masked = value_be(inputs.value);
	masked[4..24].copy_from_slice(&inputs.proof_message);
	alpha = alpha.add(&Scalar::reduce_from_bytes(&masked).neg());

	let bits: Vec<bool> = (0..NBITS).map(|j| (inputs.value >> j) & 1 == 1).collect();

	let a_point = {
		let mut acc = Point::generator().mul(&alpha);
		for j in 0..NBITS {
			acc = if bits[j] {
				acc.add(&g_gens[j])
			} else {
				acc.add(&h_gens[j].negate())
			};
		}
		acc
	};

	let mut sl = Vec::with_capacity(NBITS);
	let mut sr = Vec::with_capacity(NBITS);
	for j in 0..NBITS {
		let (l, r) = scalar_chacha20(&inputs.rewind_nonce, (j + 2) as u64);
		sl.push(l);
		sr.push(r);
	}
	let s_point = {
		let mut acc = Point::generator().mul(&rho);
		for j in 0..NBITS {
			acc = acc.add(&g_gens[j].mul(&sl[j])).add(&h_gens[j].mul(&sr[j]));
		}
		acc
	};

	commit = update_commit(&commit, &a_point, &s_point);
	let y = Scalar::reduce_from_bytes(&commit);
	commit = update_commit(&commit, &a_point, &s_point);
	let z = Scalar::reduce_from_bytes(&commit);

	let poly = lr_polynomial(&bits, &sl, &sr, &y, &z);
	let (t1, t2) = t1_t2(&poly);

	let t1_point = Point::generator().mul(&tau1).add(&h().mul(&t1));
	let t2_point = Point::generator().mul(&tau2).add(&h().mul(&t2));

	commit = update_commit(&commit, &t1_point, &t2_point);
	let x = Scalar::reduce_from_bytes(&commit);

	let tau_x = tau1
		.mul(&x)
		.add(&tau2.mul(&x.square()))
		.add(&z.square().mul(&inputs.blind))
		.neg();
	let mu = rho.mul(&x).add(&alpha).neg();

	// Evaluate L(x), R(x) at the challenge point for the inner-product step.
	let l_final: Vec<Scalar> = poly.l0.iter().zip(&poly.l1).map(|(l0, l1)| l0.add(&l1.mul(&x))).collect();
	let r_final: Vec<Scalar> = poly.r0.iter().zip(&poly.r1).map(|(r0, r1)| r0.add(&r1.mul(&x))).collect();

	let ipp = inner_product_argument_prove(commit, l_final, r_final, g_gens, h_gens);

	let mut out = vec![0u8; PROOF_SIZE];
	out[0..32].copy_from_slice(&tau_x.to_bytes());
	out[32..64].copy_from_slice(&mu.to_bytes());
	let points_serialized = serialize_points(&[a_point, s_point, t1_point, t2_point]);
	out[64..64 + points_serialized.len()].copy_from_slice(&points_serialized);

	let ipp_offset = 64 + points_serialized.len();
	if ipp_offset + ipp.len() != PROOF_SIZE {
		return Err(Error::BadProofLength {
			got: ipp_offset + ipp.len(),
			want: PROOF_SIZE,
		});
	}
	out[ipp_offset..ipp_offset + ipp.len()].copy_from_slice(&ipp);

	let mut fixed = [0u8; PROOF_SIZE];
	fixed.copy_from_slice(&out);
	Ok(fixed)
}

/// §4.5.1: a `ceil(k/8)`-byte bit vector of y-parity/QR bits, followed by
/// each point's x-coordinate.
fn serialize_points(points: &[Point]) -> Vec<u8> {
	let k = points.len();
	let mut out = vec![0u8; (k + 7) / 8];
	for (i, p) in points.iter().enumerate() {
		if !p.y_is_quadratic_residue() {
			out[i / 8] |= 1 << (i % 8);
		}
	}
	for p in points {
		out.extend_from_slice(&p.x_bytes());
	}
	out
}

fn deserialize_points(bytes: &[u8], k: usize) -> Result<(Vec<Point>, usize)> {
	let bitvec_len = (k + 7) / 8;
	if bytes.len() < bitvec_len + 32 * k {
		return Err(Error::InvalidEncoding);
	}
	let bitvec = &bytes[0..bitvec_len];
	let mut points = Vec::with_capacity(k);
	for i in 0..k {
		let non_residue = bitvec[i / 8] & (1 << (i % 8)) != 0;
		let x_start = bitvec_len + i * 32;
		let mut x = [0u8; 32];
		x.copy_from_slice(&bytes[x_start..x_start + 32]);
		points.push(point_from_x(&x, non_residue)?);
	}
	Ok((points, bitvec_len + 32 * k))
}

fn point_from_x(x: &[u8; 32], y_non_residue: bool) -> Result<Point> {
	for prefix in [0x02u8, 0x03u8] {
		let mut enc = [0u8; 33];
		enc[0] = prefix;
		enc[1..].copy_from_slice(x);
		if let Ok(p) = Point::from_compressed(&enc) {
			if p.y_is_quadratic_residue() != y_non_residue {
				return Ok(p);
			}
		}
	}
	Err(Error::NotOnCurve)
}

fn msm(points: &[Point], scalars: &[Scalar]) -> Point {
	points
		.iter()
		.zip(scalars)
		.fold(Point::identity(), |acc, (p, s)| acc.add(&p.mul(s)))
}

/// Recursive inner-product argument, folding generators every round.
fn inner_product_argument_prove(
	commit_in: [u8; 32],
	mut a: Vec<Scalar>,
	mut b: Vec<Scalar>,
	g_gens: &[Point],
	h_gens: &[Point],
) -> Vec<u8> {
	let mut commit = commit_in;
	let mut g = g_gens.to_vec();
	let mut hh = h_gens.to_vec();
	let mut l_points = Vec::new();
	let mut r_points = Vec::new();

	while a.len() > IP_AB_SCALARS / 2 {
		let half = a.len() / 2;
		let (a_lo, a_hi) = a.split_at(half);
		let (b_lo, b_hi) = b.split_at(half);
		let (g_lo, g_hi) = g.split_at(half);
		let (h_lo, h_hi) = hh.split_at(half);

		let l_scalar = inner_product(a_lo, b_hi);
		let r_scalar = inner_product(a_hi, b_lo);

		let l_point = msm(g_hi, a_lo).add(&msm(h_lo, b_hi)).add(&h().mul(&l_scalar));
		let r_point = msm(g_lo, a_hi).add(&msm(h_hi, b_lo)).add(&h().mul(&r_scalar));

		commit = update_commit(&commit, &l_point, &r_point);
		let x = Scalar::reduce_from_bytes(&commit);
		let x_inv = x.invert().expect("transcript challenges are overwhelmingly nonzero");

		let new_a: Vec<Scalar> = a_lo.iter().zip(a_hi).map(|(lo, hi)| lo.mul(&x).add(&hi.mul(&x_inv))).collect();
		let new_b: Vec<Scalar> = b_lo.iter().zip(b_hi).map(|(lo, hi)| lo.mul(&x_inv).add(&hi.mul(&x))).collect();
		let new_g: Vec<Point> = g_lo.iter().zip(g_hi).map(|(lo, hi)| lo.mul(&x_inv).add(&hi.mul(&x))).collect();
		let new_h: Vec<Point> = h_lo.iter().zip(h_hi).map(|(lo, hi)| lo.mul(&x).add(&hi.mul(&x_inv))).collect();

		a = new_a;
		b = new_b;
		g = new_g;
		hh = new_h;

		l_points.push(l_point);
		r_points.push(r_point);
	}

	let mut out = Vec::new();
	out.extend_from_slice(&inner_product(&a, &b).to_bytes());
	for s in &a {
		out.extend_from_slice(&s.to_bytes());
	}
	for s in &b {
		out.extend_from_slice(&s.to_bytes());
	}
	let mut all_points = l_points;
	all_points.extend(r_points);
	out.extend(serialize_points(&all_points));
	out
}

/// Verify a 675-byte range proof against `commitment`.
pub fn verify(proof: &[u8], commitment: &Point, extra_data: &[u8]) -> Result<()> {
	if proof.len() != PROOF_SIZE {
		return Err(Error::BadProofLength {
			got: proof.len(),
			want: PROOF_SIZE,
		});
	}

	let tau_x = Scalar::from_bytes(proof[0..32].try_into().unwrap())?;
	let mu = Scalar::from_bytes(proof[32..64].try_into().unwrap())?;

	let (points, rest_offset) = deserialize_points(&proof[64..], 4)?;
	let (a_point, s_point, t1_point, t2_point) = (points[0], points[1], points[2], points[3]);

	let mut commit = update_commit(&[0u8; 32], commitment, &h());
	commit = mix_extra_data(&commit, extra_data);
	commit = update_commit(&commit, &a_point, &s_point);
	let y = Scalar::reduce_from_bytes(&commit);
	commit = update_commit(&commit, &a_point, &s_point);
	let z = Scalar::reduce_from_bytes(&commit);
	commit = update_commit(&commit, &t1_point, &t2_point);
	let x = Scalar::reduce_from_bytes(&commit);

	let generators = get_generators(2 * NBITS);
	let (g_gens, h_gens) = generators.split_at(NBITS);

	let delta = compute_delta(&y, &z);
	let lhs = Point::generator().mul(&tau_x).add(&h().mul(&delta));
	let rhs = commitment
		.mul(&z.square())
		.add(&t1_point.mul(&x))
		.add(&t2_point.mul(&x.square()));
	if lhs != rhs {
		return Err(Error::InvalidRangeProof);
	}

	let ipp_bytes = &proof[64 + rest_offset..];
	inner_product_argument_verify(commit, ipp_bytes, g_gens, h_gens, &a_point, &s_point, &x, &mu)
}

fn compute_delta(y: &Scalar, z: &Scalar) -> Scalar {
	let z2 = z.square();
	let z3 = z2.mul(z);

	let mut sum_y = Scalar::ZERO;
	let mut sum_2 = Scalar::ZERO;
	let mut yn = one();
	let mut twon = one();
	for _ in 0..NBITS {
		sum_y = sum_y.add(&yn);
		sum_2 = sum_2.add(&twon);
		yn = yn.mul(y);
		twon = twon.mul(&two());
	}

	z.sub(&z2).mul(&sum_y).sub(&z3.mul(&sum_2))
}

#[allow(clippy::too_many_arguments)]
fn inner_product_argument_verify(
	commit_in: [u8; 32],
	ipp: &[u8],
	g_gens: &[Point],
	h_gens: &[Point],
	a_point: &Point,
	s_point: &Point,
	x: &Scalar,
	mu: &Scalar,
) -> Result<()> {
	let mut commit = commit_in;
	let n = g_gens.len();
	let mut num_rounds = 0;
	{
		let mut k = n;
		while k > IP_AB_SCALARS / 2 {
			k /= 2;
			num_rounds += 1;
		}
	}

	let points_start = 32 + 32 * (IP_AB_SCALARS / 2) * 2;
	if ipp.len() < points_start {
		return Err(Error::InvalidEncoding);
	}
	let (lr_points, _) = deserialize_points(&ipp[points_start..], 2 * num_rounds)?;

	let mut challenges = Vec::with_capacity(num_rounds);
	for i in 0..num_rounds {
		let l = lr_points[i];
		let r = lr_points[num_rounds + i];
		commit = update_commit(&commit, &l, &r);
		challenges.push(Scalar::reduce_from_bytes(&commit));
	}

	let mut g_folded = g_gens.to_vec();
	let mut h_folded = h_gens.to_vec();
	for xk in &challenges {
		let xk_inv = xk.invert()?;
		let half = g_folded.len() / 2;
		let (g_lo, g_hi) = g_folded.split_at(half);
		let (h_lo, h_hi) = h_folded.split_at(half);
		g_folded = g_lo.iter().zip(g_hi).map(|(lo, hi)| lo.mul(&xk_inv).add(&hi.mul(xk))).collect();
		h_folded = h_lo.iter().zip(h_hi).map(|(lo, hi)| lo.mul(xk).add(&hi.mul(&xk_inv))).collect();
	}

	let a_final = Scalar::from_bytes(ipp[32..64].try_into().unwrap())?;
	let b_final = Scalar::from_bytes(ipp[64..96].try_into().unwrap())?;
	let claimed_ip = Scalar::from_bytes(ipp[0..32].try_into().unwrap())?;

	if a_final.mul(&b_final) != claimed_ip {
		return Err(Error::InvalidRangeProof);
	}

	// P = A + x*S - mu*G must equal the folded <a,b> commitment.
	let p_check = a_point.add(&s_point.mul(x)).add(&Point::generator().mul(&mu.neg()));
	let expected = g_folded[0].mul(&a_final).add(&h_folded[0].mul(&b_final));
	if p_check != expected {
		return Err(Error::InvalidRangeProof);
	}

	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn inner_product_proof_length_grows_with_n() {
		assert!(inner_product_proof_length(64) > inner_product_proof_length(4));
	}

	#[test]
	fn prove_produces_fixed_size_output() {
		let inputs = ProveInputs {
			value: 1_000,
			blind: Scalar::from_bytes(&[3u8; 32]).unwrap(),
			private_nonce: [1u8; 32],
			rewind_nonce: [2u8; 32],
			proof_message: [0u8; 20],
			extra_data: &[],
		};
		if let Ok(proof) = prove(&inputs) {
			assert_eq!(proof.len(), PROOF_SIZE);
		}
	}
}
