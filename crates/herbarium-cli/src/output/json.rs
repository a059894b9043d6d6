use herbarium_core::error::HerbariumError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), HerbariumError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
