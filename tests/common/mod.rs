//! Common test utilities and fixtures.
//!
//! This module provides shared record files and helper functions to reduce
//! duplication across the test suite.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use lodging_store::Date;
use tempfile::TempDir;

// =============================================================================
// Record Files
// =============================================================================

pub const HOSTS: &str = "\
3
1001 clave1 24 4.8
1002 clave2 6 3.9
1003 clave3 60 4.2
";

pub const GUESTS: &str = "\
3
2001;Ana Gómez;pw1;12;4.5
2002;Luis Pérez;pw2;3;3.0
2003;Marta Ruiz;pw3;30;4.9
";

pub const LODGINGS: &str = "\
4
Casa del Río;100;1001;Antioquia;Medellín;1;Calle 10 #5-20;150.0;wifi,piscina
Apartamento Centro;101;1001;Antioquia;Medellín;2;Carrera 45 #12-3;90.5;wifi
Finca El Roble;200;1002;Antioquia;Rionegro;1;Vereda La Mosca;210;chimenea
Loft Laureles;300;1003;Antioquia;Medellín;2;Circular 1 #70-1;120;aire acondicionado
";

pub const BOOKINGS: &str = "\
4 57
01/06/2025;3;50;100;2001;T;20/05/2025;450;llegamos tarde
10/01/2025;2;51;101;2002;P;02/01/2025;181;
15/06/2025;4;55;300;2003;P;01/06/2025;480;cuna; por favor
05/02/2025;1;57;200;2001;T;01/02/2025;210;
";

/// Write the fixture record files into `dir`.
pub fn write_records(dir: &Path) -> anyhow::Result<()> {
    fs::write(dir.join("anfitriones.txt"), HOSTS)?;
    fs::write(dir.join("huespedes.txt"), GUESTS)?;
    fs::write(dir.join("alojamientos.txt"), LODGINGS)?;
    fs::write(dir.join("reservaciones.txt"), BOOKINGS)?;
    Ok(())
}

/// A temporary data directory populated with the fixture records.
pub fn data_dir() -> anyhow::Result<TempDir> {
    let dir = TempDir::new()?;
    write_records(dir.path())?;
    Ok(dir)
}

pub fn date(s: &str) -> anyhow::Result<Date> {
    Ok(Date::parse(s)?)
}
