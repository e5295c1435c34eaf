use serde::Serialize;

/// The eight named phases of the lunation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Classify a lunation fraction, 0 = new, 0.5 = full.
    ///
    /// The quarter points are exact; anything between them is a crescent or
    /// gibbous phase. Values outside `[0, 1)` wrap around, NaN is treated as new.
    pub fn from_fraction(fraction: f64) -> Self {
        let f = fraction.rem_euclid(1.0);

        if f.is_nan() || f == 0.0 {
            MoonPhase::New
        } else if f < 0.25 {
            MoonPhase::WaxingCrescent
        } else if f == 0.25 {
            MoonPhase::FirstQuarter
        } else if f < 0.5 {
            MoonPhase::WaxingGibbous
        } else if f == 0.5 {
            MoonPhase::Full
        } else if f < 0.75 {
            MoonPhase::WaningGibbous
        } else if f == 0.75 {
            MoonPhase::LastQuarter
        } else {
            MoonPhase::WaningCrescent
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl std::fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
