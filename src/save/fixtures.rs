//! In-memory save archives for tests

use std::io::{Cursor, Write};

use flate2::write::DeflateEncoder;
use flate2::Compression;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::ModRecord;
use crate::codec::{BinaryWriter, Version};

/// Builds the `level.dat` prefix up to and including the mod table
pub struct LevelDatBuilder {
    format_version: Version,
    game_version: Version,
    campaign: String,
    level_name: String,
    mods: Vec<ModRecord>,
}

impl LevelDatBuilder {
    pub fn new(format_version: Version) -> Self {
        Self {
            format_version,
            game_version: format_version,
            campaign: String::new(),
            level_name: "freeplay".to_string(),
            mods: Vec::new(),
        }
    }

    pub fn game_version(mut self, version: Version) -> Self {
        self.game_version = version;
        self
    }

    pub fn campaign(mut self, name: &str) -> Self {
        self.campaign = name.to_string();
        self
    }

    pub fn level_name(mut self, name: &str) -> Self {
        self.level_name = name.to_string();
        self
    }

    pub fn with_mod(mut self, name: &str, version: Version, checksum: u32) -> Self {
        self.mods.push(ModRecord {
            name: name.to_string(),
            version,
            checksum,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        writer.write_version(self.format_version, false);
        writer.write_raw(&[0, 1, 0]);
        writer.write_string(&self.campaign);
        writer.write_string(&self.level_name);
        writer.write_string("base");
        writer.write_raw(&[1, 0, 0]);
        writer.write_string("");
        writer.write_raw(&[0, 0, 0, 0]);
        writer.write_version(self.game_version, true);
        writer.write_raw(&[0xB4, 0xC7, 1]);

        writer.write_opt_u32(self.mods.len() as u32);
        for record in &self.mods {
            record.write(&mut writer);
        }
        // Map data follows the mod table in real saves
        writer.write_raw(&[0x5A; 16]);
        writer.finish()
    }
}

pub fn zip_entries(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Older layout: uncompressed `level.dat`.
pub fn plain_save(level_dat: &[u8]) -> Vec<u8> {
    zip_entries(&[
        ("test-save/control.lua", &b"require('util')"[..]),
        ("test-save/level.dat", level_dat),
    ])
}

/// Newer layout: deflated `level.dat0` next to unrelated entries.
pub fn deflated_save(level_dat: &[u8]) -> Vec<u8> {
    zip_entries(&[
        ("test-save/level-init.dat", &b"init"[..]),
        ("test-save/level.dat0", deflate(level_dat).as_slice()),
        ("test-save/preview.jpg", &[0xFF, 0xD8, 0xFF, 0xE0][..]),
    ])
}
