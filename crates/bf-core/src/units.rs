// bf-core/src/units.rs

use uom::si::f64::{Length as UomLength, Pressure as UomPressure, VolumeRate as UomVolumeRate};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type FlowRate = UomVolumeRate;

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn lps(v: f64) -> FlowRate {
    use uom::si::volume_rate::liter_per_second;
    FlowRate::new::<liter_per_second>(v)
}

/// Millimetres to metres.
#[inline]
pub fn mm_to_m(v: f64) -> f64 {
    use uom::si::length::meter;
    mm(v).get::<meter>()
}

/// Litres per second to cubic metres per second.
#[inline]
pub fn lps_to_m3ps(v: f64) -> f64 {
    use uom::si::volume_rate::cubic_meter_per_second;
    lps(v).get::<cubic_meter_per_second>()
}

pub mod constants {
    use super::*;

    /// Pressure of one metre of water column, in kPa.
    pub const GAMMA_KPA_PER_M: f64 = 9.806_65;

    /// Water-column height to pressure.
    #[inline]
    pub fn head_to_pressure(head: Length) -> Pressure {
        use uom::si::length::meter;
        kpa(GAMMA_KPA_PER_M * head.get::<meter>())
    }

    /// Pressure to water-column height.
    #[inline]
    pub fn pressure_to_head(p: Pressure) -> Length {
        use uom::si::pressure::kilopascal;
        m(p.get::<kilopascal>() / GAMMA_KPA_PER_M)
    }

    #[inline]
    pub fn head_m_to_kpa(head_m: f64) -> f64 {
        use uom::si::pressure::kilopascal;
        head_to_pressure(m(head_m)).get::<kilopascal>()
    }

    #[inline]
    pub fn kpa_to_head_m(p_kpa: f64) -> f64 {
        use uom::si::length::meter;
        pressure_to_head(kpa(p_kpa)).get::<meter>()
    }
}

#[cfg(test)]
mod tests {
    use super::constants::*;
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = kpa(100.0);
        let _l = m(2.0);
        let _d = mm(32.0);
        let _q = lps(0.5);
    }

    #[test]
    fn metric_conversions() {
        assert!((mm_to_m(32.0) - 0.032).abs() < 1e-15);
        assert!((lps_to_m3ps(1.5) - 0.0015).abs() < 1e-15);
    }

    #[test]
    fn one_metre_of_water_is_gamma() {
        assert!((head_m_to_kpa(1.0) - GAMMA_KPA_PER_M).abs() < 1e-12);
        assert!((kpa_to_head_m(GAMMA_KPA_PER_M * 10.0) - 10.0).abs() < 1e-12);
    }
}
