//! Direction of the Kaaba from a point on the globe.

pub const KAABA_LAT: f64 = 21.4225;
pub const KAABA_LNG: f64 = 39.8262;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Initial great-circle bearing towards the Kaaba, degrees clockwise from true north in `[0, 360)`.
pub fn qibla_bearing(lat: f64, lng: f64) -> f64 {
    let phi1 = lat.to_radians();
    let phi2 = KAABA_LAT.to_radians();
    let dl = (KAABA_LNG - lng).to_radians();

    let y = dl.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dl.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// 16-wind compass label for a bearing in degrees.
pub fn compass_point(bearing: f64) -> &'static str {
    let idx = ((bearing.rem_euclid(360.0) / 22.5).round() as usize) % COMPASS_POINTS.len();
    COMPASS_POINTS[idx]
}
