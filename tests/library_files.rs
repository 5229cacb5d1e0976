use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use schlib::export;
use schlib::library::{FILE_HEADER, Library, SIGNATURE};
use schlib::package::Package;
use schlib::Error;

fn properties_frame(body: &[u8]) -> Vec<u8> {
    let length = (body.len() + 1) as u32;
    let mut out = length.to_le_bytes().to_vec();
    out.extend_from_slice(body);
    out.push(0);
    out
}

fn binary_frame(body: &[u8]) -> Vec<u8> {
    let length = body.len() as u32 | (1 << 24);
    let mut out = length.to_le_bytes().to_vec();
    out.extend_from_slice(body);
    out
}

fn library_header(entries: &str) -> Vec<u8> {
    let mut body = b"|HEADER=".to_vec();
    body.extend_from_slice(SIGNATURE);
    body.extend_from_slice(b"|WEIGHT=20|MINORVERSION=2|UNIQUEID=ABCDEFGH");
    body.extend_from_slice(entries.as_bytes());
    properties_frame(&body)
}

fn resistor_stream() -> Vec<u8> {
    let mut data = properties_frame(
        b"|RECORD=1|LIBREFERENCE=RES|DESIGNITEMID=RC0603FR-0710KL|PARTCOUNT=2|DISPLAYMODECOUNT=1",
    );
    data.extend(properties_frame(
        b"|RECORD=14|OWNERPARTID=1|LOCATION.X=-10|LOCATION.Y=-4|CORNER.X=10|CORNER.Y=4",
    ));
    data.extend(binary_frame(&[0x02, 0x00, 0x00, 0x00, 0x01, 0x00]));
    data.extend(properties_frame(b"|RECORD=34|OWNERPARTID=-1|TEXT=R?|NAME=Designator"));
    data.extend(properties_frame(b"|RECORD=41|OWNERPARTID=-1|NAME=Comment|TEXT=10k"));
    data.extend(properties_frame(b"|RECORD=41|OWNERPARTID=-1|NAME=Value|TEXT=10k 1%"));
    data.extend(properties_frame(
        b"|RECORD=45|MODELNAME=RESC1608X55N|DESCRIPTION=Chip, 0603|MODELTYPE=PCBLIB",
    ));
    data
}

fn capacitor_stream() -> Vec<u8> {
    let mut data = properties_frame(b"|RECORD=1|LIBREFERENCE=CAP|PARTCOUNT=2");
    data.extend(properties_frame(b"|RECORD=34|TEXT=C?"));
    data.extend(properties_frame(b"|RECORD=41|NAME=Comment|TEXT=100n"));
    data
}

fn fill_container<F: Read + Write + Seek>(
    file: &mut cfb::CompoundFile<F>,
    header: &[u8],
    parts: &[(&str, Vec<u8>)],
) {
    file.create_stream(format!("/{}", FILE_HEADER))
        .unwrap()
        .write_all(header)
        .unwrap();
    for (libref, data) in parts {
        file.create_storage(format!("/{}", libref)).unwrap();
        file.create_stream(format!("/{}/Data", libref))
            .unwrap()
            .write_all(data)
            .unwrap();
    }
    file.flush().unwrap();
}

fn write_schlib(path: &Path, header: &[u8], parts: &[(&str, Vec<u8>)]) {
    let mut file = cfb::create(path).unwrap();
    fill_container(&mut file, header, parts);
}

fn standard_parts() -> Vec<(&'static str, Vec<u8>)> {
    vec![("RES", resistor_stream()), ("CAP", capacitor_stream())]
}

const STANDARD_ENTRIES: &str =
    "|COMPCOUNT=2|LIBREF0=RES|COMPDESCR0=Thick film\nresistor|LIBREF1=CAP|COMPDESCR1=MLCC";

#[test]
fn reads_library_from_compound_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Passives.SchLib");
    write_schlib(&path, &library_header(STANDARD_ENTRIES), &standard_parts());

    let library = Library::from_filename(&path).unwrap();

    assert_eq!(library.len(), 2);
    assert_eq!(library.declared_count(), Some(2));

    let resistor = library.get("RES").unwrap();
    assert_eq!(resistor.id, "RC0603FR-0710KL");
    assert_eq!(resistor.designator, "R?");
    assert_eq!(resistor.description, "Thick film resistor");
    assert_eq!(resistor.properties["Comment"], "10k");
    assert_eq!(resistor.properties["Value"], "10k 1%");
    assert_eq!(resistor.footprints["RESC1608X55N"], "Chip, 0603");

    let capacitor = library.get("CAP").unwrap();
    assert_eq!(capacitor.id, "CAP");
    assert_eq!(capacitor.description, "MLCC");
}

#[test]
fn reads_library_from_memory() {
    let mut file = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    fill_container(&mut file, &library_header(STANDARD_ENTRIES), &standard_parts());
    let bytes = file.into_inner().into_inner();

    let library = Library::from_reader(Cursor::new(bytes)).unwrap();
    let ids: Vec<&str> = library.parts().map(|part| part.id.as_str()).collect();
    assert_eq!(ids, ["RC0603FR-0710KL", "CAP"]);
}

#[test]
fn missing_component_storage_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Partial.SchLib");
    write_schlib(
        &path,
        &library_header("|LIBREF0=GONE|LIBREF1=CAP"),
        &[("CAP", capacitor_stream())],
    );

    let library = Library::from_filename(&path).unwrap();
    assert_eq!(library.len(), 1);
    assert!(library.get("CAP").is_some());
}

#[test]
fn wrong_file_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Sheet.SchDoc");
    let header = properties_frame(
        b"|HEADER=Protel for Windows - Schematic Capture Binary File Version 5.0|WEIGHT=3",
    );
    write_schlib(&path, &header, &[]);

    assert!(matches!(
        Library::from_filename(&path),
        Err(Error::FormatMismatch { .. })
    ));
}

#[test]
fn package_exports_all_readable_libraries() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("Symbols")).unwrap();
    write_schlib(
        &dir.path().join("Symbols").join("Passives.SchLib"),
        &library_header(STANDARD_ENTRIES),
        &standard_parts(),
    );
    write_schlib(
        &dir.path().join("Semis.SchLib"),
        &library_header("|LIBREF0=BJT|COMPDESCR0=NPN transistor"),
        &[(
            "BJT",
            [
                properties_frame(b"|RECORD=1|DESIGNITEMID=BC847"),
                properties_frame(b"|RECORD=34|TEXT=Q?"),
                properties_frame(b"|RECORD=41|NAME=Package|TEXT=SOT-23"),
            ]
            .concat(),
        )],
    );
    fs::write(dir.path().join("Broken.SchLib"), b"not a compound file").unwrap();

    let manifest = "\u{FEFF}[Design]\r\n\
        Version=1.0\r\n\
        \r\n\
        [Document1]\r\n\
        DocumentPath=Symbols\\Passives.SchLib\r\n\
        \r\n\
        [Document2]\r\n\
        DocumentPath=Broken.SchLib\r\n\
        \r\n\
        [Document3]\r\n\
        DocumentPath=Semis.SchLib\r\n\
        \r\n\
        [Document4]\r\n\
        DocumentPath=Footprints.PcbLib\r\n";
    let manifest_path = dir.path().join("Components.LibPkg");
    fs::write(&manifest_path, manifest).unwrap();

    let package = Package::from_filename(&manifest_path).unwrap();

    assert_eq!(package.name, "Components.LibPkg");
    assert_eq!(package.list_documents().len(), 4);
    let names: Vec<&str> = package.libraries().map(|(name, _)| name).collect();
    assert_eq!(names, ["Passives.SchLib", "Semis.SchLib"]);
    assert_eq!(package.library("Semis.SchLib").unwrap().len(), 1);
    assert_eq!(package.parts().count(), 3);

    let mut out = Vec::new();
    export::write_parts(&mut out, &export::columns(&["Package"]), package.parts()).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "id,designator,description,Comment,Package",
            "RC0603FR-0710KL,R?,Thick film resistor,10k,",
            "CAP,C?,MLCC,100n,",
            "BJT,Q?,NPN transistor,,SOT-23",
        ]
    );
}

#[test]
fn package_with_wrong_version_fails() {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("Old.LibPkg");
    fs::write(&manifest_path, "[Design]\nVersion=0.9\n").unwrap();

    assert!(matches!(
        Package::from_filename(&manifest_path),
        Err(Error::Manifest(_))
    ));
}
