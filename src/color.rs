use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_rgb(rgb)
        })
        .collect()
}

fn to_rgb(rgb: Srgb) -> RGBColor {
    let rgb: Srgb<u8> = rgb.into_format();
    RGBColor(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Qualitative cycles
// ---------------------------------------------------------------------------

const TAB10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];

const TAB20: [u32; 20] = [
    0x1f77b4, 0xaec7e8, 0xff7f0e, 0xffbb78, 0x2ca02c, 0x98df8a, 0xd62728, 0xff9896, 0x9467bd,
    0xc5b0d5, 0x8c564b, 0xc49c94, 0xe377c2, 0xf7b6d2, 0x7f7f7f, 0xc7c7c7, 0xbcbd22, 0xdbdb8d,
    0x17becf, 0x9edae5,
];

const fn hex(c: u32) -> RGBColor {
    RGBColor((c >> 16) as u8, (c >> 8) as u8, c as u8)
}

/// Which colour sequence a figure draws its series from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorCycle {
    #[default]
    Tab10,
    Tab20,
    /// `generate_palette(n)` for figures that know their series count.
    Even(usize),
}

impl ColorCycle {
    /// Colour of the `i`-th series; wraps around.
    pub fn color(&self, i: usize) -> RGBColor {
        match *self {
            ColorCycle::Tab10 => hex(TAB10[i % TAB10.len()]),
            ColorCycle::Tab20 => hex(TAB20[i % TAB20.len()]),
            ColorCycle::Even(n) => {
                let n = n.max(1);
                let hue = ((i % n) as f32 / n as f32) * 360.0;
                to_rgb(Hsl::new(hue, 0.75, 0.55).into_color())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sequential colormap
// ---------------------------------------------------------------------------

/// Piecewise-linear colormap over `[0, 1]`, interpolated in linear RGB.
#[derive(Debug, Clone)]
pub struct Colormap {
    anchors: Vec<LinSrgb>,
}

impl Colormap {
    /// Blue-grey-yellow map in the spirit of cividis.
    pub fn cividis() -> Self {
        let anchors = [0x00224e, 0x414d6b, 0x7c7b78, 0xbcaf6f, 0xfee838]
            .into_iter()
            .map(|c| {
                let RGBColor(r, g, b) = hex(c);
                Srgb::new(r, g, b).into_format::<f32>().into_linear()
            })
            .collect();
        Colormap { anchors }
    }

    /// Colour at `t`, clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> RGBColor {
        let n = self.anchors.len();
        if n == 1 {
            return to_rgb(Srgb::from_linear(self.anchors[0]));
        }
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (n - 1) as f64;
        let lo = (pos.floor() as usize).min(n - 2);
        let frac = (pos - lo as f64) as f32;
        let mixed = self.anchors[lo].mix(self.anchors[lo + 1], frac);
        to_rgb(Srgb::from_linear(mixed))
    }

    /// `n` colours sampled at band midpoints, for filled contour levels.
    pub fn sample(&self, n: usize) -> Vec<RGBColor> {
        (0..n)
            .map(|i| self.at((i as f64 + 0.5) / n as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn cycles_wrap() {
        assert_eq!(ColorCycle::Tab10.color(0), ColorCycle::Tab10.color(10));
        assert_eq!(ColorCycle::Tab20.color(1), RGBColor(0xae, 0xc7, 0xe8));
        assert_eq!(ColorCycle::Even(3).color(1), ColorCycle::Even(3).color(4));
    }

    #[test]
    fn colormap_endpoints() {
        let map = Colormap::cividis();
        assert_eq!(map.at(0.0), RGBColor(0x00, 0x22, 0x4e));
        assert_eq!(map.at(1.0), RGBColor(0xfe, 0xe8, 0x38));
        assert_eq!(map.at(-3.0), map.at(0.0));
        assert_eq!(map.sample(6).len(), 6);
    }
}
