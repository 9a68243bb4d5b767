// Copyright 2020-2024, The Tremor Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::CommandFactory;
use clap_mangen::Man;
use std::{
    env,
    fs::File,
    io::Error,
    path::{Path, PathBuf},
};

include!("src/cli.rs");

fn build_manpages(outdir: &Path) -> Result<(), Error> {
    let app = Cli::command();

    let file = Path::new(&outdir).join("law.1");
    let mut file = File::create(file)?;

    Man::new(app).render(&mut file)?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let Some(outdir) = env::var_os("OUT_DIR") else {
        return Ok(());
    };

    // Create `target/man-pages/` folder.
    let out_path = PathBuf::from(outdir);
    let Some(target) = out_path.ancestors().nth(4) else {
        return Ok(());
    };
    let path = target.join("man-pages");
    std::fs::create_dir_all(&path)?;

    build_manpages(&path)?;

    Ok(())
}
