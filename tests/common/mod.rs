use std::fs::File;
use std::io::Error;
use std::path::Path;

/// Writes an actions CSV adding `rows` products cycling through `distinct` ids.
pub fn generate_actions_csv(path: &Path, rows: usize, distinct: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["type", "id", "kind", "price", "quantity"])?;

    for i in 0..rows {
        let id = format!("sku-{}", i % distinct);
        wtr.write_record(["add", id.as_str(), "product", "100", "1"])?;
    }

    wtr.flush()?;
    Ok(())
}
