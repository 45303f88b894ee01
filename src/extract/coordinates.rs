//! Geocoordinate discovery
//!
//! Machine pages expose their position in several inconsistent ways: inline
//! map-initialisation scripts, Google Maps iframes in two different embed
//! formats, and occasionally explicit `data-*` attributes on a map element.
//! [`resolve_coordinates`] tries the script and iframe sources in strict
//! priority order; [`map_attribute_coordinates`] is applied afterwards by the
//! record extractor and overrides whatever the resolver found.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// A `(latitude, longitude)` pair
pub type Coordinates = (f64, f64);

static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("valid selector"));
static MAP_IFRAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"iframe[src*="maps.google"], iframe[src*="google.com/maps"]"#)
        .expect("valid selector")
});
static MAP_ELEMENT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[data-lat][data-lng], [data-latitude][data-longitude]")
        .expect("valid selector")
});

static SCRIPT_LAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\blat(?:itude)?["']?\s*[:=]\s*(-?[0-9.]+)"#).expect("valid latitude regex")
});
static SCRIPT_LNG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:lng|lon(?:gitude)?)["']?\s*[:=]\s*(-?[0-9.]+)"#)
        .expect("valid longitude regex")
});
static LATLNG_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"LatLng\s*\(\s*(-?[0-9.]+)\s*,\s*(-?[0-9.]+)\s*\)").expect("valid LatLng regex")
});
static IFRAME_QUERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[?&]q=(-?[0-9.]+),(-?[0-9.]+)").expect("valid iframe query regex")
});
static IFRAME_TILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!2d(-?[0-9.]+)!3d(-?[0-9.]+)").expect("valid iframe tile regex")
});

/// Coordinate sources, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSource {
    /// `lat: …` / `lng: …` (or `latitude`/`longitude`/`lon`) in one script
    ScriptKeyValue,
    /// `LatLng(<lat>, <lng>)` constructor call in a script
    ScriptLatLngCall,
    /// Map iframe `src` with `q=<lat>,<lng>`
    IframeQuery,
    /// Map iframe `src` with `!2d<lng>!3d<lat>`; longitude comes first here
    IframeTileOffset,
}

impl CoordinateSource {
    pub const PRIORITY: [CoordinateSource; 4] = [
        Self::ScriptKeyValue,
        Self::ScriptLatLngCall,
        Self::IframeQuery,
        Self::IframeTileOffset,
    ];

    /// Tries this source alone
    ///
    /// A match whose numbers do not parse counts as no match for that script
    /// or iframe; later scripts or iframes of the same kind are still tried.
    pub fn locate(self, document: &Html) -> Option<Coordinates> {
        match self {
            Self::ScriptKeyValue => script_texts(document).find_map(|script| {
                let lat = SCRIPT_LAT_RE.captures(&script)?.get(1)?.as_str();
                let lng = SCRIPT_LNG_RE.captures(&script)?.get(1)?.as_str();
                parse_pair(lat, lng)
            }),
            Self::ScriptLatLngCall => script_texts(document).find_map(|script| {
                let caps = LATLNG_CALL_RE.captures(&script)?;
                parse_pair(caps.get(1)?.as_str(), caps.get(2)?.as_str())
            }),
            Self::IframeQuery => map_iframe_sources(document).find_map(|src| {
                let caps = IFRAME_QUERY_RE.captures(src)?;
                parse_pair(caps.get(1)?.as_str(), caps.get(2)?.as_str())
            }),
            Self::IframeTileOffset => map_iframe_sources(document).find_map(|src| {
                let caps = IFRAME_TILE_RE.captures(src)?;
                let (lng, lat) = (caps.get(1)?.as_str(), caps.get(2)?.as_str());
                parse_pair(lat, lng)
            }),
        }
    }
}

/// Returns the first coordinates found by the script and iframe sources
pub fn resolve_coordinates(document: &Html) -> Option<Coordinates> {
    CoordinateSource::PRIORITY.iter().find_map(|source| {
        let found = source.locate(document)?;
        tracing::trace!("Coordinates from {:?}: {:?}", source, found);
        Some(found)
    })
}

/// Reads `data-lat`/`data-lng` (or `data-latitude`/`data-longitude`) from
/// the first map element whose values both parse
pub fn map_attribute_coordinates(document: &Html) -> Option<Coordinates> {
    document.select(&MAP_ELEMENT).find_map(|element| {
        let el = element.value();
        let lat = non_empty_attr(el, "data-lat").or_else(|| non_empty_attr(el, "data-latitude"))?;
        let lng =
            non_empty_attr(el, "data-lng").or_else(|| non_empty_attr(el, "data-longitude"))?;
        parse_pair(lat, lng)
    })
}

fn non_empty_attr<'a>(element: &'a scraper::node::Element, name: &str) -> Option<&'a str> {
    element.attr(name).filter(|v| !v.trim().is_empty())
}

fn script_texts(document: &Html) -> impl Iterator<Item = String> + '_ {
    document
        .select(&SCRIPT)
        .map(|script| script.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
}

fn map_iframe_sources(document: &Html) -> impl Iterator<Item = &str> {
    document
        .select(&MAP_IFRAME)
        .filter_map(|iframe| iframe.value().attr("src"))
}

/// Parses both halves; either failing discards the pair
fn parse_pair(lat: &str, lng: &str) -> Option<Coordinates> {
    Some((parse_coordinate(lat)?, parse_coordinate(lng)?))
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
