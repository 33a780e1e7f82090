//! SLD color-map generation for raster layers.
//!
//! Turns classification boundaries into an SLD 1.0 `RasterSymbolizer`
//! document that GeoServer accepts as an uploaded style.

/// Color ramp applied across the classification boundaries, low to high.
const COLOR_RAMP: [&str; 11] = [
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026",
    "#800026", "#54000d", "#2b0000",
];

/// Render an SLD document mapping `boundaries` onto the color ramp, with a
/// fully transparent entry for the nodata sentinel.
///
/// GeoServer requires color-map entries in increasing quantity order, so the
/// nodata entry goes after the ramp when the sentinel exceeds the data
/// maximum and before it otherwise (sentinels like -9999 sort below any real
/// data).
pub fn raster_colormap_sld(layer_name: &str, boundaries: &[f64], nodata: f64) -> String {
    let mut entries = String::new();

    let nodata_entry = format!(
        "              <ColorMapEntry color=\"#ffffff\" quantity=\"{}\" opacity=\"0\"/>\n",
        nodata
    );
    let data_max = boundaries.last().copied().unwrap_or(f64::NEG_INFINITY);
    let nodata_above = nodata >= data_max;

    if !nodata_above {
        entries.push_str(&nodata_entry);
    }

    let last = boundaries.len().saturating_sub(1).max(1);
    for (i, boundary) in boundaries.iter().enumerate() {
        let color = COLOR_RAMP[i * (COLOR_RAMP.len() - 1) / last];
        entries.push_str(&format!(
            "              <ColorMapEntry color=\"{}\" quantity=\"{}\"/>\n",
            color, boundary
        ));
    }

    if nodata_above {
        entries.push_str(&nodata_entry);
    }

    let mut xml = String::new();
    xml.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<StyledLayerDescriptor version="1.0.0"
    xmlns="http://www.opengis.net/sld"
    xmlns:ogc="http://www.opengis.net/ogc"
    xmlns:xlink="http://www.w3.org/1999/xlink"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://www.opengis.net/sld http://schemas.opengis.net/sld/1.0.0/StyledLayerDescriptor.xsd">
"#,
    );
    xml.push_str(&format!(
        r#"  <NamedLayer>
    <Name>{0}</Name>
    <UserStyle>
      <Name>{0}</Name>
      <Title>Classified raster style for {0}</Title>
      <FeatureTypeStyle>
        <Rule>
          <RasterSymbolizer>
            <Opacity>1.0</Opacity>
            <ColorMap>
{1}            </ColorMap>
          </RasterSymbolizer>
        </Rule>
      </FeatureTypeStyle>
    </UserStyle>
  </NamedLayer>
</StyledLayerDescriptor>
"#,
        layer_name, entries
    ));

    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundaries() -> Vec<f64> {
        (0..=10).map(|i| i as f64 * 5.0).collect()
    }

    #[test]
    fn test_entry_count_and_layer_name() {
        let sld = raster_colormap_sld("shakemap_padang", &boundaries(), -9999.0);
        assert_eq!(sld.matches("<ColorMapEntry").count(), 12);
        assert!(sld.contains("<Name>shakemap_padang</Name>"));
    }

    #[test]
    fn test_low_sentinel_goes_first() {
        let sld = raster_colormap_sld("layer", &boundaries(), -9999.0);
        let nodata_pos = sld.find("quantity=\"-9999\"").unwrap();
        let first_data_pos = sld.find("quantity=\"0\"").unwrap();
        assert!(nodata_pos < first_data_pos);
        assert!(sld.contains("color=\"#ffffff\" quantity=\"-9999\" opacity=\"0\""));
    }

    #[test]
    fn test_high_sentinel_goes_last() {
        let sld = raster_colormap_sld("layer", &boundaries(), 99999.0);
        let nodata_pos = sld.find("quantity=\"99999\"").unwrap();
        let last_data_pos = sld.find("quantity=\"50\"").unwrap();
        assert!(nodata_pos > last_data_pos);
    }

    #[test]
    fn test_ramp_spans_first_to_last_color() {
        let sld = raster_colormap_sld("layer", &boundaries(), -9999.0);
        assert!(sld.contains(&format!("color=\"{}\" quantity=\"0\"", COLOR_RAMP[0])));
        assert!(sld.contains(&format!("color=\"{}\" quantity=\"50\"", COLOR_RAMP[10])));
    }
}
