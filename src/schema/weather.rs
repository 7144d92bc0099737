//! OpenWeatherMap response shapes
//!
//! Shapes are registered leaves first; composite shapes resolve the pieces
//! they reuse from the registry, so a missing dependency surfaces as
//! `UnknownSchema` at startup rather than at validation time.

use super::registry::SchemaRegistry;
use super::types::SchemaNode;
use crate::error::Result;

/// Registry name of the current-weather stream root
pub const CURRENT_WEATHER: &str = "current_weather";

/// Registry name of the one-call stream root
pub const ONE_CALL: &str = "one_call";

/// Registry name of the 5-day / 3-hour forecast stream root
pub const FREE_FORECAST: &str = "free_forecast";

/// Field stamped on every emitted record
pub const SYNCED_AT: &str = "synced_at";

/// Build the registry of every shape the API can return
pub fn weather_registry() -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    register_shared(&mut registry)?;
    register_one_call(&mut registry)?;
    register_forecast(&mut registry)?;
    register_roots(&mut registry)?;
    Ok(registry)
}

fn register_shared(registry: &mut SchemaRegistry) -> Result<()> {
    registry.register(
        "coord",
        SchemaNode::object([("lon", SchemaNode::number()), ("lat", SchemaNode::number())])?,
    )?;

    registry.register(
        "weather",
        SchemaNode::object([
            ("id", SchemaNode::integer()),
            ("main", SchemaNode::string()),
            ("description", SchemaNode::string()),
            ("icon", SchemaNode::string()),
        ])?,
    )?;
    let weather = registry.resolve("weather")?;
    registry.register("weather_list", SchemaNode::array(weather))?;

    registry.register(
        "current_main",
        SchemaNode::object_with_required(
            [
                ("temp", SchemaNode::number()),
                ("feels_like", SchemaNode::number()),
                ("temp_min", SchemaNode::number()),
                ("temp_max", SchemaNode::number()),
                ("pressure", SchemaNode::number()),
                ("humidity", SchemaNode::number()),
                ("sea_level", SchemaNode::number()),
                ("grnd_level", SchemaNode::number()),
            ],
            &["temp"],
        )?,
    )?;

    registry.register(
        "wind",
        SchemaNode::object([
            ("speed", SchemaNode::number()),
            ("deg", SchemaNode::number()),
            ("gust", SchemaNode::number()),
        ])?,
    )?;

    registry.register("clouds", SchemaNode::object([("all", SchemaNode::number())])?)?;

    // rain and snow share a shape; either block only appears when it applies
    registry.register(
        "precipitation",
        SchemaNode::object([("1h", SchemaNode::number()), ("3h", SchemaNode::number())])?,
    )?;

    registry.register(
        "sys",
        SchemaNode::object([
            ("type", SchemaNode::integer()),
            ("id", SchemaNode::integer()),
            ("message", SchemaNode::number()),
            ("country", SchemaNode::string()),
            ("sunrise", SchemaNode::integer()),
            ("sunset", SchemaNode::integer()),
        ])?,
    )?;

    Ok(())
}

fn register_one_call(registry: &mut SchemaRegistry) -> Result<()> {
    let weather_list = registry.resolve("weather_list")?;
    let precipitation = registry.resolve("precipitation")?;

    registry.register(
        "onecall_current",
        SchemaNode::object([
            ("dt", SchemaNode::integer()),
            ("sunrise", SchemaNode::integer()),
            ("sunset", SchemaNode::integer()),
            ("temp", SchemaNode::number()),
            ("feels_like", SchemaNode::number()),
            ("pressure", SchemaNode::number()),
            ("humidity", SchemaNode::number()),
            ("dew_point", SchemaNode::number()),
            ("uvi", SchemaNode::number()),
            ("clouds", SchemaNode::number()),
            ("visibility", SchemaNode::number()),
            ("wind_speed", SchemaNode::number()),
            ("wind_deg", SchemaNode::number()),
            ("wind_gust", SchemaNode::number()),
            ("weather", weather_list.clone()),
            ("rain", precipitation.clone()),
            ("snow", precipitation.clone()),
        ])?,
    )?;

    registry.register(
        "onecall_minutely",
        SchemaNode::array(SchemaNode::object_with_required(
            [
                ("dt", SchemaNode::integer()),
                ("precipitation", SchemaNode::number()),
            ],
            &["dt"],
        )?),
    )?;

    registry.register(
        "onecall_hourly",
        SchemaNode::array(SchemaNode::object_with_required(
            [
                ("dt", SchemaNode::integer()),
                ("temp", SchemaNode::number()),
                ("feels_like", SchemaNode::number()),
                ("pressure", SchemaNode::number()),
                ("humidity", SchemaNode::number()),
                ("dew_point", SchemaNode::number()),
                ("uvi", SchemaNode::number()),
                ("clouds", SchemaNode::number()),
                ("visibility", SchemaNode::number()),
                ("wind_speed", SchemaNode::number()),
                ("wind_deg", SchemaNode::number()),
                ("wind_gust", SchemaNode::number()),
                ("weather", weather_list.clone()),
                ("pop", SchemaNode::number()),
                ("rain", precipitation.clone()),
                ("snow", precipitation),
            ],
            &["dt"],
        )?),
    )?;

    registry.register(
        "daily_temp",
        SchemaNode::object([
            ("day", SchemaNode::number()),
            ("min", SchemaNode::number()),
            ("max", SchemaNode::number()),
            ("night", SchemaNode::number()),
            ("eve", SchemaNode::number()),
            ("morn", SchemaNode::number()),
        ])?,
    )?;

    registry.register(
        "daily_feels_like",
        SchemaNode::object([
            ("day", SchemaNode::number()),
            ("night", SchemaNode::number()),
            ("eve", SchemaNode::number()),
            ("morn", SchemaNode::number()),
        ])?,
    )?;

    let daily_temp = registry.resolve("daily_temp")?;
    let daily_feels_like = registry.resolve("daily_feels_like")?;

    // daily rain/snow are plain totals, unlike the hourly blocks
    registry.register(
        "onecall_daily",
        SchemaNode::array(SchemaNode::object_with_required(
            [
                ("dt", SchemaNode::integer()),
                ("sunrise", SchemaNode::integer()),
                ("sunset", SchemaNode::integer()),
                ("moonrise", SchemaNode::integer()),
                ("moonset", SchemaNode::integer()),
                ("moon_phase", SchemaNode::number()),
                ("summary", SchemaNode::string()),
                ("temp", daily_temp),
                ("feels_like", daily_feels_like),
                ("pressure", SchemaNode::number()),
                ("humidity", SchemaNode::number()),
                ("dew_point", SchemaNode::number()),
                ("wind_speed", SchemaNode::number()),
                ("wind_deg", SchemaNode::number()),
                ("wind_gust", SchemaNode::number()),
                ("weather", weather_list),
                ("clouds", SchemaNode::number()),
                ("pop", SchemaNode::number()),
                ("rain", SchemaNode::number()),
                ("snow", SchemaNode::number()),
                ("uvi", SchemaNode::number()),
            ],
            &["dt"],
        )?),
    )?;

    Ok(())
}

fn register_forecast(registry: &mut SchemaRegistry) -> Result<()> {
    registry.register(
        "forecast_main",
        SchemaNode::object_with_required(
            [
                ("temp", SchemaNode::number()),
                ("feels_like", SchemaNode::number()),
                ("temp_min", SchemaNode::number()),
                ("temp_max", SchemaNode::number()),
                ("pressure", SchemaNode::number()),
                ("sea_level", SchemaNode::number()),
                ("grnd_level", SchemaNode::number()),
                ("humidity", SchemaNode::number()),
                ("temp_kf", SchemaNode::number()),
            ],
            &["temp"],
        )?,
    )?;

    let item = SchemaNode::object_with_required(
        [
            ("dt", SchemaNode::integer()),
            ("main", registry.resolve("forecast_main")?),
            ("weather", registry.resolve("weather_list")?),
            ("clouds", registry.resolve("clouds")?),
            ("wind", registry.resolve("wind")?),
            ("rain", registry.resolve("precipitation")?),
            ("snow", registry.resolve("precipitation")?),
            ("visibility", SchemaNode::number()),
            ("pop", SchemaNode::number()),
            ("sys", SchemaNode::object([("pod", SchemaNode::string())])?),
            ("dt_txt", SchemaNode::string()),
        ],
        &["dt"],
    )?;
    registry.register("forecast_item", item)?;

    let city = SchemaNode::object([
        ("id", SchemaNode::integer()),
        ("name", SchemaNode::string()),
        ("coord", registry.resolve("coord")?),
        ("country", SchemaNode::string()),
        ("population", SchemaNode::integer()),
        ("timezone", SchemaNode::integer()),
        ("sunrise", SchemaNode::integer()),
        ("sunset", SchemaNode::integer()),
    ])?;
    registry.register("city", city)?;

    Ok(())
}

fn register_roots(registry: &mut SchemaRegistry) -> Result<()> {
    let current_weather = SchemaNode::object([
        (SYNCED_AT, SchemaNode::datetime()),
        ("coord", registry.resolve("coord")?),
        ("weather", registry.resolve("weather_list")?),
        ("base", SchemaNode::string()),
        ("main", registry.resolve("current_main")?),
        ("visibility", SchemaNode::number()),
        ("wind", registry.resolve("wind")?),
        ("rain", registry.resolve("precipitation")?),
        ("snow", registry.resolve("precipitation")?),
        ("clouds", registry.resolve("clouds")?),
        ("dt", SchemaNode::integer()),
        ("sys", registry.resolve("sys")?),
        ("timezone", SchemaNode::integer()),
        ("id", SchemaNode::integer()),
        ("name", SchemaNode::string()),
        ("cod", SchemaNode::string()),
    ])?;
    registry.register(CURRENT_WEATHER, current_weather)?;

    let one_call = SchemaNode::object([
        (SYNCED_AT, SchemaNode::datetime()),
        ("lat", SchemaNode::number()),
        ("lon", SchemaNode::number()),
        ("timezone", SchemaNode::string()),
        ("timezone_offset", SchemaNode::integer()),
        ("current", registry.resolve("onecall_current")?),
        ("minutely", registry.resolve("onecall_minutely")?),
        ("hourly", registry.resolve("onecall_hourly")?),
        ("daily", registry.resolve("onecall_daily")?),
    ])?;
    registry.register(ONE_CALL, one_call)?;

    let free_forecast = SchemaNode::object([
        ("cod", SchemaNode::string()),
        ("message", SchemaNode::number()),
        ("cnt", SchemaNode::integer()),
        ("list", SchemaNode::array(registry.resolve("forecast_item")?)),
        ("city", registry.resolve("city")?),
        (SYNCED_AT, SchemaNode::datetime()),
    ])?;
    registry.register(FREE_FORECAST, free_forecast)?;

    Ok(())
}
