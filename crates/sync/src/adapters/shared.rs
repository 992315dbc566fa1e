//! Attach-or-create adapters for name-identified reference data (legal
//! under games only).
//!
//! Identity is the exact name, matched case-sensitively with no
//! normalization: "Acme" and "acme" are distinct rows. For any name at most
//! one row exists; an import either appends the current game to the row's
//! membership or creates the row with the game as its only member.

use uuid::Uuid;

use lanshelf_manifest::RecordKind;
use lanshelf_store::{Collection, Company, Engine, Entity, Genre, Platform, Repository, Tag};

use crate::SyncError;
use crate::adapters::{ImportCtx, require_game};

/// A name-identified entity with a single membership collection.
pub(crate) trait NamedRef: Entity {
    const KIND: RecordKind;

    fn named(name: &str, member: Uuid) -> Self;
    fn name(&self) -> &str;
    fn members(&self) -> &[Uuid];
    fn members_mut(&mut self) -> &mut Vec<Uuid>;
}

macro_rules! impl_named_ref {
    ($ty:ty, $kind:expr) => {
        impl NamedRef for $ty {
            const KIND: RecordKind = $kind;

            fn named(name: &str, member: Uuid) -> Self {
                Self {
                    id: Uuid::new_v4(),
                    name: name.to_owned(),
                    game_ids: vec![member],
                }
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn members(&self) -> &[Uuid] {
                &self.game_ids
            }

            fn members_mut(&mut self) -> &mut Vec<Uuid> {
                &mut self.game_ids
            }
        }
    };
}

impl_named_ref!(Tag, RecordKind::Tag);
impl_named_ref!(Genre, RecordKind::Genre);
impl_named_ref!(Platform, RecordKind::Platform);
impl_named_ref!(Engine, RecordKind::Engine);
impl_named_ref!(Collection, RecordKind::Collection);

/// Existence is global by name, not scoped to the parent unit.
pub(crate) async fn exists<T: NamedRef>(
    ctx: &ImportCtx<'_>,
    repo: &dyn Repository<T>,
    name: &str,
) -> Result<bool, SyncError> {
    require_game(ctx.parent, T::KIND)?;
    Ok(repo.first_where(&|row: &T| row.name() == name).await?.is_some())
}

/// Creates the row with the current game as its only member.
pub(crate) async fn add<T: NamedRef>(
    ctx: &ImportCtx<'_>,
    repo: &dyn Repository<T>,
    name: &str,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, T::KIND)?;
    repo.add(T::named(name, game.id)).await?;
    Ok(())
}

/// Appends the current game to the existing row's membership; a no-op when
/// the game is already a member (which keeps re-imports idempotent).
pub(crate) async fn update<T: NamedRef>(
    ctx: &ImportCtx<'_>,
    repo: &dyn Repository<T>,
    name: &str,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, T::KIND)?;
    let mut row = repo
        .first_where(&|row: &T| row.name() == name)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: T::KIND,
            id: name.to_owned(),
        })?;

    if !row.members().contains(&game.id) {
        row.members_mut().push(game.id);
        repo.update(row).await?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Companies (two membership roles on one row)
// ---------------------------------------------------------------------------

/// The role a company plays for the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompanyRole {
    Developer,
    Publisher,
}

impl CompanyRole {
    fn kind(self) -> RecordKind {
        match self {
            CompanyRole::Developer => RecordKind::Developer,
            CompanyRole::Publisher => RecordKind::Publisher,
        }
    }

    fn members(self, company: &Company) -> &Vec<Uuid> {
        match self {
            CompanyRole::Developer => &company.developed_game_ids,
            CompanyRole::Publisher => &company.published_game_ids,
        }
    }

    fn members_mut(self, company: &mut Company) -> &mut Vec<Uuid> {
        match self {
            CompanyRole::Developer => &mut company.developed_game_ids,
            CompanyRole::Publisher => &mut company.published_game_ids,
        }
    }
}

/// A company row exists when any row carries the name, regardless of role.
pub(crate) async fn company_exists(
    ctx: &ImportCtx<'_>,
    role: CompanyRole,
    name: &str,
) -> Result<bool, SyncError> {
    require_game(ctx.parent, role.kind())?;
    let found = ctx
        .store
        .companies
        .first_where(&|c: &Company| c.name == name)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn company_add(
    ctx: &ImportCtx<'_>,
    role: CompanyRole,
    name: &str,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, role.kind())?;
    let mut company = Company {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        developed_game_ids: Vec::new(),
        published_game_ids: Vec::new(),
    };
    role.members_mut(&mut company).push(game.id);
    ctx.store.companies.add(company).await?;
    Ok(())
}

pub(crate) async fn company_update(
    ctx: &ImportCtx<'_>,
    role: CompanyRole,
    name: &str,
) -> Result<(), SyncError> {
    let game = require_game(ctx.parent, role.kind())?;
    let mut company = ctx
        .store
        .companies
        .first_where(&|c: &Company| c.name == name)
        .await?
        .ok_or_else(|| SyncError::RecordVanished {
            kind: role.kind(),
            id: name.to_owned(),
        })?;

    if !role.members(&company).contains(&game.id) {
        role.members_mut(&mut company).push(game.id);
        ctx.store.companies.update(company).await?;
    }
    Ok(())
}
