//! Trend chart rendering (plotters)
//!
//! Calories with the target line on top, macro grams below.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::nutrition::DailyTotal;

pub const DEFAULT_CHART_WIDTH: u32 = 1200;
pub const DEFAULT_CHART_HEIGHT: u32 = 900;

fn date_label(series: &[DailyTotal], x: i32) -> String {
    usize::try_from(x)
        .ok()
        .and_then(|i| series.get(i))
        .map(|d| d.date.format("%m/%d").to_string())
        .unwrap_or_default()
}

/// Render the trend chart as PNG bytes
pub fn generate_trend_chart(
    series: &[DailyTotal],
    calorie_target: f64,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if series.is_empty() {
        return Err("No data to chart".to_string());
    }

    let days = series.len() as i32;
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;
        let (upper, lower) = root.split_vertically(height / 2);

        // Calories
        let calorie_max = series
            .iter()
            .map(|d| d.nutrition.calories)
            .fold(calorie_target.max(100.0), f64::max)
            * 1.1;

        let mut chart = ChartBuilder::on(&upper)
            .caption("Calories", ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..days, 0.0..calorie_max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .x_labels(series.len().min(10))
            .x_label_formatter(&|x| date_label(series, *x))
            .y_desc("kcal")
            .draw()
            .map_err(|e| e.to_string())?;

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0, calorie_target), (days - 1, calorie_target)],
                ShapeStyle::from(&RGBColor(128, 128, 128).mix(0.7)).stroke_width(2),
            )))
            .map_err(|e| e.to_string())?
            .label(format!("Target ({:.0} kcal)", calorie_target))
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], RGBColor(128, 128, 128).stroke_width(2))
            });

        let calorie_points: Vec<(i32, f64)> = series
            .iter()
            .enumerate()
            .map(|(i, d)| (i as i32, d.nutrition.calories))
            .collect();

        chart
            .draw_series(LineSeries::new(calorie_points.clone(), RED.stroke_width(2)))
            .map_err(|e| e.to_string())?
            .label("Calories")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .draw_series(calorie_points.iter().map(|(x, y)| Circle::new((*x, *y), 3, RED.filled())))
            .map_err(|e| e.to_string())?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        // Macros
        let macro_lines: [(&str, RGBColor, fn(&DailyTotal) -> f64); 4] = [
            ("Carbs", RGBColor(230, 159, 0), |d| d.nutrition.carbs_g),
            ("Protein", RGBColor(0, 114, 178), |d| d.nutrition.protein_g),
            ("Fat", RGBColor(213, 94, 0), |d| d.nutrition.fat_g),
            ("Fibre", RGBColor(0, 158, 115), |d| d.nutrition.fibre_g),
        ];

        let grams_max = series
            .iter()
            .flat_map(|d| macro_lines.iter().map(move |(_, _, value)| value(d)))
            .fold(10.0, f64::max)
            * 1.1;

        let mut chart = ChartBuilder::on(&lower)
            .caption("Macronutrients", ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..days, 0.0..grams_max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .x_labels(series.len().min(10))
            .x_label_formatter(&|x| date_label(series, *x))
            .y_desc("grams")
            .draw()
            .map_err(|e| e.to_string())?;

        for (label, color, value) in macro_lines {
            chart
                .draw_series(LineSeries::new(
                    series.iter().enumerate().map(|(i, d)| (i as i32, value(d))),
                    color.stroke_width(2),
                ))
                .map_err(|e| e.to_string())?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    encode_png(buffer, width, height)
}

/// Encode a raw RGB buffer as PNG
pub fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let img = RgbImage::from_raw(width, height, buffer).ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}
