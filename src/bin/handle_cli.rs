//! Native demo shell for handle-engine.
//!
//! Builds a few named handle scenarios through the public API and writes
//! each result as a Wavefront OBJ file with quad faces, so the output can be
//! eyeballed in any mesh viewer. The two consumed input boundaries are
//! appended to the vertex list purely so the OBJ is self-contained; in a
//! host integration those vertices already exist in the mesh.

use std::f64::consts::TAU;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use handle_engine::geom::{HandleGeometry, HandleOptions, Point3, VertexRef, make_handle};

const USAGE: &str = r"handle_cli (handle-engine)

USAGE:
  handle_cli list
  handle_cli run <scenario|all> [options]

SCENARIOS:
  square_bridge
  square_to_triangle
  twisted_column

OPTIONS (run):
  --out-dir <dir>   Write <scenario>.obj to this directory (default: .)
  --overwrite       Overwrite existing output files
  -h, --help        Show this help
";

fn main() {
    if let Err(err) = run() {
        eprintln!("handle_cli error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = std::env::args().skip(1);

    let Some(command) = args.next() else {
        println!("{USAGE}");
        return Ok(());
    };

    match command.as_str() {
        "list" => {
            for scenario in Scenario::ALL {
                println!("{}", scenario.name());
            }
            Ok(())
        }
        "run" => cmd_run(args),
        "-h" | "--help" | "help" => {
            println!("{USAGE}");
            Ok(())
        }
        other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
    }
}

fn cmd_run(mut args: impl Iterator<Item = String>) -> Result<(), String> {
    let Some(selector) = args.next() else {
        return Err(format!("`run` needs a scenario name or `all`\n\n{USAGE}"));
    };

    let mut out_dir = PathBuf::from(".");
    let mut overwrite = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out-dir" => {
                out_dir = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| "`--out-dir` needs a value".to_string())?;
            }
            "--overwrite" => overwrite = true,
            other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
        }
    }

    let scenarios: Vec<Scenario> = if selector == "all" {
        Scenario::ALL.to_vec()
    } else {
        vec![
            Scenario::ALL
                .iter()
                .copied()
                .find(|s| s.name() == selector)
                .ok_or_else(|| format!("unknown scenario `{selector}`"))?,
        ]
    };

    fs::create_dir_all(&out_dir)
        .map_err(|err| format!("cannot create {}: {err}", out_dir.display()))?;

    for scenario in scenarios {
        let path = out_dir.join(format!("{}.obj", scenario.name()));
        if path.exists() && !overwrite {
            return Err(format!(
                "{} already exists (use --overwrite)",
                path.display()
            ));
        }
        let report = scenario.write_obj(&path)?;
        println!(
            "{}: {} faces ({} degenerate), {} new points -> {}",
            scenario.name(),
            report.face_count,
            report.degenerate_face_count,
            report.point_count,
            path.display()
        );
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scenario {
    SquareBridge,
    SquareToTriangle,
    TwistedColumn,
}

struct ScenarioReport {
    face_count: usize,
    degenerate_face_count: usize,
    point_count: usize,
}

impl Scenario {
    const ALL: [Self; 3] = [Self::SquareBridge, Self::SquareToTriangle, Self::TwistedColumn];

    fn name(self) -> &'static str {
        match self {
            Self::SquareBridge => "square_bridge",
            Self::SquareToTriangle => "square_to_triangle",
            Self::TwistedColumn => "twisted_column",
        }
    }

    fn build(self) -> Result<(Vec<Point3>, Vec<Point3>, HandleGeometry, usize), String> {
        let (source, target, options) = match self {
            Self::SquareBridge => (
                regular_polygon(4, 1.0, 0.0, false),
                regular_polygon(4, 1.0, 3.0, true),
                HandleOptions { segments: 8, ..HandleOptions::symmetric(0.75) },
            ),
            Self::SquareToTriangle => (
                regular_polygon(4, 1.0, 0.0, false),
                regular_polygon(3, 1.0, 2.0, true),
                HandleOptions { segments: 4, ..HandleOptions::straight() },
            ),
            Self::TwistedColumn => (
                regular_polygon(6, 1.0, 0.0, false),
                regular_polygon(6, 1.0, 5.0, true),
                HandleOptions {
                    segments: 24,
                    weight_start: 0.4,
                    weight_end: 0.4,
                    twists: 1,
                },
            ),
        };

        let (geometry, diagnostics) = make_handle(&source, 0, &target, 0, options)
            .map_err(|err| format!("{}: {err}", self.name()))?;
        let degenerate = diagnostics.degenerate_face_count;
        Ok((source, target, geometry, degenerate))
    }

    fn write_obj(self, path: &Path) -> Result<ScenarioReport, String> {
        let (source, target, geometry, degenerate_face_count) = self.build()?;

        let file = File::create(path)
            .map_err(|err| format!("cannot create {}: {err}", path.display()))?;
        let mut out = BufWriter::new(file);

        let write = |out: &mut BufWriter<File>, line: String| {
            out.write_all(line.as_bytes())
                .map_err(|err| format!("cannot write {}: {err}", path.display()))
        };

        write(&mut out, format!("o {}\n", self.name()))?;
        for p in geometry
            .points
            .iter()
            .chain(source.iter())
            .chain(target.iter())
        {
            write(&mut out, format!("v {} {} {}\n", p.x, p.y, p.z))?;
        }

        // OBJ indices are 1-based: interior points first, then the two
        // input boundaries.
        let source_base = geometry.points.len() + 1;
        let target_base = source_base + source.len();
        for face in &geometry.faces {
            let indices: Vec<String> = face
                .iter()
                .map(|vertex| {
                    let index = match *vertex {
                        VertexRef::Interior(i) => i + 1,
                        VertexRef::Source(i) => source_base + i,
                        VertexRef::Target(i) => target_base + i,
                    };
                    index.to_string()
                })
                .collect();
            write(&mut out, format!("f {}\n", indices.join(" ")))?;
        }

        out.flush()
            .map_err(|err| format!("cannot write {}: {err}", path.display()))?;

        Ok(ScenarioReport {
            face_count: geometry.faces.len(),
            degenerate_face_count,
            point_count: geometry.points.len(),
        })
    }
}

fn regular_polygon(sides: usize, radius: f64, z: f64, clockwise: bool) -> Vec<Point3> {
    (0..sides)
        .map(|k| {
            let a = k as f64 * TAU / sides as f64;
            let a = if clockwise { -a } else { a };
            Point3::new(radius * a.cos(), radius * a.sin(), z)
        })
        .collect()
}
