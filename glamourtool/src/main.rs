use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use fallible_iterator::{FallibleIterator, IteratorExt};
use glamour::{
    actor::{ActorLayout, ActorView},
    apply::Applier,
    equipment::{ArmorPiece, SlotPiece},
    ids::{EquipSlot, Gender, Race},
    items::{ItemCatalog, ItemInfo},
    mask::{EquipMask, SlotFieldMask},
    restricted::RestrictedGear,
    snapshot::Snapshot,
};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::{fs, io::IsTerminal, path::Path, sync::Arc};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log library events down to debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// CSV export of the Item sheet, used to build the restricted gear table
    #[arg(short, long, env = "GLAMOUR_ITEMS", global = true, value_name = "ITEMS_CSV")]
    items: Option<Box<Path>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a snapshot of any version and print its contents
    Show { snapshot: Snapshot },

    /// Re-encode a snapshot of any version as the current version
    Migrate { snapshot: Snapshot },

    /// Export a snapshot's equipment → .csv
    Export {
        snapshot: Snapshot,
        /// File to write
        #[arg(short, long)]
        out: Box<Path>,
    },

    /// Capture an actor dump as a snapshot
    Capture {
        /// Actor dump in the compact layout
        #[arg(short, long)]
        actor: Box<Path>,
    },

    /// Apply a snapshot onto an actor dump in place
    Apply {
        snapshot: Snapshot,
        /// Actor dump in the compact layout
        #[arg(short, long)]
        actor: Box<Path>,
        /// Slots whose models are written (e.g. "head,body"), defaults to the snapshot's mask
        #[arg(long, value_delimiter = ',')]
        slots: Option<Vec<EquipSlot>>,
        /// Slots whose dyes are written, defaults to the snapshot's mask
        #[arg(long, value_delimiter = ',')]
        dyes: Option<Vec<EquipSlot>>,
        /// Leave customization and wetness untouched
        #[arg(long)]
        no_customize: bool,
    },

    /// Look up what a body wears instead of a restricted armor model
    Resolve {
        #[arg(long)]
        set: u16,
        #[arg(long)]
        variant: u8,
        #[arg(long)]
        slot: EquipSlot,
        #[arg(long)]
        race: Race,
        #[arg(long)]
        gender: Gender,
    },
}

#[derive(Serialize)]
struct EquipRow {
    slot: &'static str,
    set: u16,
    weapon_type: Option<u16>,
    variant: u16,
    dye: u8,
}

impl EquipRow {
    fn new(slot: EquipSlot, piece: SlotPiece) -> Self {
        let (weapon_type, variant) = match piece {
            SlotPiece::Weapon(w) => (Some(w.weapon_type()), w.variant()),
            SlotPiece::Armor(a) => (None, a.variant().into()),
        };
        Self {
            slot: slot.name(),
            set: piece.set(),
            weapon_type,
            variant,
            dye: piece.dye(),
        }
    }
}

static GEAR: OnceCell<Arc<RestrictedGear>> = OnceCell::new();

fn load_items(path: &Path) -> anyhow::Result<ItemCatalog> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let catalog: ItemCatalog = reader
        .deserialize::<ItemInfo>()
        .transpose_into_fallible()
        .collect()?;

    debug!("loaded {} items from {}", catalog.len(), path.display());
    Ok(catalog)
}

fn restricted_gear(items: &Path) -> anyhow::Result<Arc<RestrictedGear>> {
    GEAR.get_or_try_init(|| -> anyhow::Result<_> {
        let catalog = load_items(items)?;
        Ok(Arc::new(RestrictedGear::build(&catalog)))
    })
    .map(Arc::clone)
}

fn applier(gear: Option<&RestrictedGear>) -> Applier<'_> {
    gear.map_or_else(Applier::unrestricted, Applier::new)
}

fn read_actor(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read actor dump {}", path.display()))
}

fn show(snapshot: &Snapshot) {
    println!("flags:     {:?}", snapshot.flags());
    println!("mask:      {:?}", snapshot.equip_mask);
    println!("alpha:     {}", snapshot.alpha());
    println!("customize: {:?}", snapshot.customize);
    for (slot, piece) in snapshot.equipment.iter() {
        match piece {
            SlotPiece::Weapon(w) => println!("{:>9}: {w:?}", slot.name()),
            SlotPiece::Armor(a) => println!("{:>9}: {a:?}", slot.name()),
        }
    }
}

fn export(snapshot: &Snapshot, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut w = csv::Writer::from_path(out)?;
    for (slot, piece) in snapshot.equipment.iter() {
        w.serialize(EquipRow::new(slot, piece))?;
    }
    w.flush()?;

    println!("{}", out.to_string_lossy());
    Ok(())
}

fn capture(applier: Applier, actor: &Path) -> anyhow::Result<()> {
    let mut mem = read_actor(actor)?;
    let view = ActorView::new(&mut mem, ActorLayout::default())?;
    println!("{}", applier.capture(&view)?.to_base64()?);
    Ok(())
}

fn apply(
    applier: Applier,
    mut snapshot: Snapshot,
    actor: &Path,
    slots: Option<Vec<EquipSlot>>,
    dyes: Option<Vec<EquipSlot>>,
    no_customize: bool,
) -> anyhow::Result<()> {
    if no_customize {
        snapshot.set_write_customizations(false);
    }

    let to_mask = |list: Option<Vec<EquipSlot>>| -> EquipMask {
        list.map_or(snapshot.equip_mask, |slots| slots.into_iter().collect())
    };
    let mask = SlotFieldMask::new(to_mask(slots), to_mask(dyes));

    let mut mem = read_actor(actor)?;
    let mut view = ActorView::new(&mut mem, ActorLayout::default())?;
    applier.apply_snapshot_masked(&mut view, &snapshot, mask);

    fs::write(actor, &mem)?;
    Ok(())
}

fn resolve(
    gear: &RestrictedGear,
    set: u16,
    variant: u8,
    slot: EquipSlot,
    race: Race,
    gender: Gender,
) -> anyhow::Result<()> {
    if slot.is_weapon() {
        bail!("{slot} is not an armor slot");
    }

    let requested = ArmorPiece::new(set, variant, 0);
    match gear.resolve(requested, slot, race, gender) {
        (true, armor) => println!("{} {}", armor.set(), armor.variant()),
        (false, _) => println!("unchanged"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let items = cli.items.as_deref();
    let gear = || items.map(restricted_gear).transpose();

    match cli.command {
        Commands::Show { snapshot } => {
            show(&snapshot);
            Ok(())
        }
        Commands::Migrate { snapshot } => {
            println!("{}", snapshot.to_base64()?);
            Ok(())
        }
        Commands::Export { snapshot, out } => export(&snapshot, &out),
        Commands::Capture { actor } => {
            let gear = gear()?;
            capture(applier(gear.as_deref()), &actor)
        }
        Commands::Apply {
            snapshot,
            actor,
            slots,
            dyes,
            no_customize,
        } => {
            let gear = gear()?;
            apply(applier(gear.as_deref()), snapshot, &actor, slots, dyes, no_customize)
        }
        Commands::Resolve {
            set,
            variant,
            slot,
            race,
            gender,
        } => {
            let gear = gear()?.ok_or(anyhow!("--items is required for resolve"))?;
            resolve(&gear, set, variant, slot, race, gender)
        }
    }
}
