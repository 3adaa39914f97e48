//! Integrates a filled product map into outgoing radiance.

use std::f64::consts::TAU;

use ibl_core::{Color, ProductMap};

/// Outgoing radiance `2pi/(W*H) * sum(product)` per channel.
///
/// The product map already carries `L * cos * sin(theta)` per texel, so this
/// is the midpoint rule for `(1/pi) * integral L cos dw`: the texel solid
/// angle `2pi/W * pi/H * sin(theta)` divided by `pi`. Sums in f64. Does not
/// modify the map; an empty map integrates to zero.
pub fn integrate(product: &ProductMap) -> Color {
    let texel_count = product.width() as u64 * product.height() as u64;
    if texel_count == 0 {
        return Color::ZERO;
    }

    let mut sum = [0.0f64; 3];
    for texel in product.texels() {
        sum[0] += texel[0] as f64;
        sum[1] += texel[1] as f64;
        sum[2] += texel[2] as f64;
    }

    let scale = TAU / texel_count as f64;
    Color::new(
        (sum[0] * scale) as f32,
        (sum[1] * scale) as f32,
        (sum[2] * scale) as f32,
    )
}
