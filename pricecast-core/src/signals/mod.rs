//! Signal interpretation: qualitative labels for a momentum snapshot.
//!
//! Purely presentational. Each indicator maps onto six bands with fixed
//! thresholds; lower bounds are inclusive unless noted.
//!
//! | RSI        | MACD          | Bollinger pos. | MA momentum     | price vs MA    |
//! |------------|---------------|----------------|-----------------|----------------|
//! | >= 80      | > 2.0         | >= 1.0         | >= 0.10         | >= 0.10        |
//! | >= 70      | > 0.5         | >= 0.8         | >= 0.03         | >= 0.03        |
//! | >= 55      | > 0.0         | >= 0.5         | >= 0.0          | >= 0.0         |
//! | >= 45      | > -0.5        | >= 0.2         | >= -0.03        | >= -0.03       |
//! | >= 30      | > -2.0        | >= 0.0         | >= -0.10        | >= -0.10       |
//! | < 30       | <= -2.0       | < 0.0          | < -0.10         | < -0.10        |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::momentum::MomentumSnapshot;

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled_enum!(
    /// RSI zone.
    RsiSignal {
        VeryOverbought => "Very Overbought",
        Overbought => "Overbought",
        Bullish => "Bullish",
        Neutral => "Neutral",
        Oversold => "Oversold",
        VeryOversold => "Very Oversold",
    }
);

labelled_enum!(
    /// MACD line strength.
    MacdSignal {
        StrongBullish => "Strong Bullish",
        Bullish => "Bullish",
        WeakBullish => "Weak Bullish",
        WeakBearish => "Weak Bearish",
        Bearish => "Bearish",
        StrongBearish => "Strong Bearish",
    }
);

labelled_enum!(
    /// Location of the price inside the Bollinger band.
    BollingerSignal {
        AboveUpperBand => "Above Upper Band",
        NearUpperBand => "Near Upper Band",
        UpperHalf => "Upper Half",
        LowerHalf => "Lower Half",
        NearLowerBand => "Near Lower Band",
        BelowLowerBand => "Below Lower Band",
    }
);

labelled_enum!(
    /// Short-vs-long moving average trend.
    TrendSignal {
        StrongUptrend => "Strong Uptrend",
        Uptrend => "Uptrend",
        WeakUptrend => "Weak Uptrend",
        WeakDowntrend => "Weak Downtrend",
        Downtrend => "Downtrend",
        StrongDowntrend => "Strong Downtrend",
    }
);

labelled_enum!(
    /// Price relative to a moving average. Shared by MA50 and MA200.
    MaDistanceSignal {
        FarAbove => "Far Above",
        Above => "Above",
        SlightlyAbove => "Slightly Above",
        SlightlyBelow => "Slightly Below",
        Below => "Below",
        FarBelow => "Far Below",
    }
);

pub fn interpret_rsi(rsi: f64) -> RsiSignal {
    if rsi >= 80.0 {
        RsiSignal::VeryOverbought
    } else if rsi >= 70.0 {
        RsiSignal::Overbought
    } else if rsi >= 55.0 {
        RsiSignal::Bullish
    } else if rsi >= 45.0 {
        RsiSignal::Neutral
    } else if rsi >= 30.0 {
        RsiSignal::Oversold
    } else {
        RsiSignal::VeryOversold
    }
}

pub fn interpret_macd(macd: f64) -> MacdSignal {
    if macd > 2.0 {
        MacdSignal::StrongBullish
    } else if macd > 0.5 {
        MacdSignal::Bullish
    } else if macd > 0.0 {
        MacdSignal::WeakBullish
    } else if macd > -0.5 {
        MacdSignal::WeakBearish
    } else if macd > -2.0 {
        MacdSignal::Bearish
    } else {
        MacdSignal::StrongBearish
    }
}

pub fn interpret_bollinger(position: f64) -> BollingerSignal {
    if position >= 1.0 {
        BollingerSignal::AboveUpperBand
    } else if position >= 0.8 {
        BollingerSignal::NearUpperBand
    } else if position >= 0.5 {
        BollingerSignal::UpperHalf
    } else if position >= 0.2 {
        BollingerSignal::LowerHalf
    } else if position >= 0.0 {
        BollingerSignal::NearLowerBand
    } else {
        BollingerSignal::BelowLowerBand
    }
}

pub fn interpret_ma_momentum(momentum: f64) -> TrendSignal {
    if momentum >= 0.10 {
        TrendSignal::StrongUptrend
    } else if momentum >= 0.03 {
        TrendSignal::Uptrend
    } else if momentum >= 0.0 {
        TrendSignal::WeakUptrend
    } else if momentum >= -0.03 {
        TrendSignal::WeakDowntrend
    } else if momentum >= -0.10 {
        TrendSignal::Downtrend
    } else {
        TrendSignal::StrongDowntrend
    }
}

pub fn interpret_price_vs_ma(ratio: f64) -> MaDistanceSignal {
    if ratio >= 0.10 {
        MaDistanceSignal::FarAbove
    } else if ratio >= 0.03 {
        MaDistanceSignal::Above
    } else if ratio >= 0.0 {
        MaDistanceSignal::SlightlyAbove
    } else if ratio >= -0.03 {
        MaDistanceSignal::SlightlyBelow
    } else if ratio >= -0.10 {
        MaDistanceSignal::Below
    } else {
        MaDistanceSignal::FarBelow
    }
}

/// Labels for every field of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub rsi: RsiSignal,
    pub macd: MacdSignal,
    pub bollinger: BollingerSignal,
    pub ma_momentum: TrendSignal,
    pub price_vs_ma50: MaDistanceSignal,
    pub price_vs_ma200: MaDistanceSignal,
}

impl SignalSummary {
    pub fn from_snapshot(snapshot: &MomentumSnapshot) -> Self {
        Self {
            rsi: interpret_rsi(snapshot.rsi),
            macd: interpret_macd(snapshot.macd),
            bollinger: interpret_bollinger(snapshot.bollinger_position),
            ma_momentum: interpret_ma_momentum(snapshot.ma_momentum),
            price_vs_ma50: interpret_price_vs_ma(snapshot.price_vs_ma50),
            price_vs_ma200: interpret_price_vs_ma(snapshot.price_vs_ma200),
        }
    }

    /// (indicator name, label) pairs in display order.
    pub fn entries(&self) -> [(&'static str, &'static str); 6] {
        [
            ("rsi", self.rsi.label()),
            ("macd", self.macd.label()),
            ("bollinger", self.bollinger.label()),
            ("ma_momentum", self.ma_momentum.label()),
            ("price_vs_ma50", self.price_vs_ma50.label()),
            ("price_vs_ma200", self.price_vs_ma200.label()),
        ]
    }
}
