/// Diagnostic tool: reads .MAP files and reports what the reader finds.
///
/// Usage:
///     cargo run --bin diag_map -- <path_to_map>
///     cargo run --bin diag_map -- data/            (reads all .map in dir)
///     cargo run --bin diag_map -- <path> --records (also lists every record)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tabmap::io::map::{MapFile, MapReader, MapReaderConfiguration};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: diag_map <path_to_map_or_directory> [--records]");
        std::process::exit(1);
    }

    let list_records = args.iter().any(|a| a == "--records");
    let path = PathBuf::from(&args[1]);
    let mut files = Vec::new();

    if path.is_dir() {
        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("Cannot read directory {}: {}", path.display(), e);
                std::process::exit(1);
            }
        };
        for entry in entries.flatten() {
            let p = entry.path();
            if p.extension()
                .map(|e| e.eq_ignore_ascii_case("map"))
                .unwrap_or(false)
            {
                files.push(p);
            }
        }
        files.sort();
    } else {
        files.push(path);
    }

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          tabmap .MAP Reader Diagnostic                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut success = 0;
    let mut failed = 0;

    for file in &files {
        if diagnose_map(file, list_records) {
            success += 1;
        } else {
            failed += 1;
        }
    }

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("Results: {} succeeded, {} failed out of {} total", success, failed, files.len());
}

fn diagnose_map(path: &Path, list_records: bool) -> bool {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    println!("{:<45} {:>8} bytes", filename, size);

    // Strict mode first, then failsafe to show how far the file decodes.
    let map = match MapReader::from_file(path).and_then(|r| r.read()) {
        Ok(map) => map,
        Err(e) => {
            println!("  ❌ strict read failed: {}", e);
            let config = MapReaderConfiguration {
                failsafe: true,
                skip_invalid_blocks: true,
            };
            match MapReader::from_file(path).and_then(|r| r.with_config(config).read()) {
                Ok(map) => {
                    println!("  ⚠️  failsafe read recovered");
                    report(&map, list_records);
                }
                Err(e) => println!("  ❌ failsafe read failed: {}", e),
            }
            return false;
        }
    };

    report(&map, list_records);
    true
}

fn report(map: &MapFile, list_records: bool) {
    let h = &map.header;
    println!(
        "  version {}  block size {}  quadrant {}  precision {}",
        h.version, h.block_size, h.coord_origin_quadrant, h.coord_precision
    );
    println!("  bounds (int)    {}", h.bounds);
    let (min, max) = h.coordsys_bounds();
    println!("  bounds (coords) {} .. {}", min, max);
    println!(
        "  objects: {} point, {} line, {} region, {} text",
        h.num_point_objects, h.num_line_objects, h.num_region_objects, h.num_text_objects
    );
    println!(
        "  projection {} ellipsoid {} units {} datum {}",
        h.projection.proj_id, h.projection.ellipsoid_id, h.projection.units_id, h.projection.datum_id
    );
    if h.projection.affine_flag {
        println!("  affine {:?}", h.projection.affine_params);
    }

    println!(
        "  index: {} node(s), {} entr(ies), root {:?}",
        map.index.len(),
        map.index.entries().count(),
        map.root_index_offset()
    );

    match &map.objects {
        Some(objects) => println!(
            "  objects: {} record(s) over {} page(s), bounds {}",
            objects.len(),
            objects.page_count(),
            objects.bounds()
        ),
        None => println!("  objects: none"),
    }

    if list_records {
        for record in map.records() {
            println!(
                "    #{:<6} {:<18} {:>3} byte(s) {} point(s) {}",
                record.id,
                format!("{:?}", record.shape_type),
                record.content_length(),
                record.number_of_points(),
                record.mbr
            );
        }
    }

    for n in &map.notifications {
        println!("  {}", n);
    }
}
