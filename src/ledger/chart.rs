//! Ledger group catalog and ledger registry lookups

use std::collections::{HashMap, HashSet};

use crate::types::*;

/// Read-only index over a set of groups and ledgers.
///
/// Resolves which statement bucket a ledger feeds. A group whose own type has
/// no bucket inherits the bucket of its nearest typed ancestor.
#[derive(Debug)]
pub struct ChartIndex<'a> {
    groups: HashMap<&'a str, &'a LedgerGroup>,
    ledgers: HashMap<&'a str, &'a Ledger>,
}

/// Where a ledger lands after bucket resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement<'a> {
    /// Feeds a statement bucket
    Bucket(StatementBucket),
    /// Group chain resolved but none of its types maps to a bucket
    Unbucketed(&'a LedgerGroup),
}

impl<'a> ChartIndex<'a> {
    pub fn new(groups: &'a [LedgerGroup], ledgers: &'a [Ledger]) -> Self {
        Self {
            groups: groups.iter().map(|g| (g.id.as_str(), g)).collect(),
            ledgers: ledgers.iter().map(|l| (l.id.as_str(), l)).collect(),
        }
    }

    pub fn group(&self, group_id: &str) -> Option<&'a LedgerGroup> {
        self.groups.get(group_id).copied()
    }

    pub fn ledger(&self, ledger_id: &str) -> Option<&'a Ledger> {
        self.ledgers.get(ledger_id).copied()
    }

    /// Direct child groups of a parent group
    pub fn child_groups(&self, parent_id: &str) -> Vec<&'a LedgerGroup> {
        let mut children: Vec<_> = self
            .groups
            .values()
            .filter(|g| g.parent_group_id.as_deref() == Some(parent_id))
            .copied()
            .collect();
        children.sort_by(|a, b| a.id.cmp(&b.id));
        children
    }

    /// Path from the root group down to `group_id`
    pub fn group_path(&self, group_id: &str) -> Result<Vec<&'a LedgerGroup>, ChartError> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(group_id);

        while let Some(id) = current {
            if !seen.insert(id) {
                return Err(ChartError::Cycle(id.to_string()));
            }
            let group = self
                .group(id)
                .ok_or_else(|| ChartError::GroupNotFound(id.to_string()))?;
            path.insert(0, group);
            current = group.parent_group_id.as_deref();
        }

        Ok(path)
    }

    /// Resolve the statement bucket for a group, walking up through parents.
    ///
    /// A parent id that does not resolve ends the walk.
    pub fn resolve_group(&self, group_id: &str) -> Result<Placement<'a>, ChartError> {
        let start = self
            .group(group_id)
            .ok_or_else(|| ChartError::GroupNotFound(group_id.to_string()))?;

        let mut seen = HashSet::new();
        let mut current = start;
        loop {
            if !seen.insert(current.id.as_str()) {
                return Err(ChartError::Cycle(current.id.clone()));
            }
            if let Some(bucket) = current.group_type.bucket() {
                return Ok(Placement::Bucket(bucket));
            }
            match current.parent_group_id.as_deref().and_then(|p| self.group(p)) {
                Some(parent) => current = parent,
                None => return Ok(Placement::Unbucketed(start)),
            }
        }
    }

    /// Resolve a ledger's bucket, reporting why it feeds no statement otherwise
    pub fn place_ledger(&self, ledger: &Ledger) -> Result<StatementBucket, EngineWarning> {
        match self.resolve_group(&ledger.group_id) {
            Ok(Placement::Bucket(bucket)) => Ok(bucket),
            Ok(Placement::Unbucketed(group)) => Err(EngineWarning::InvalidGroupType {
                ledger_id: ledger.id.clone(),
                group_id: group.id.clone(),
                group_type: group.group_type,
            }),
            Err(ChartError::Cycle(group_id)) => Err(EngineWarning::GroupCycle { group_id }),
            Err(_) => Err(EngineWarning::DanglingGroup {
                ledger_id: ledger.id.clone(),
                group_id: ledger.group_id.clone(),
            }),
        }
    }
}

/// Check that a group set forms a forest with resolvable parents
pub fn validate_hierarchy(groups: &[LedgerGroup]) -> Result<(), ChartError> {
    let index = ChartIndex::new(groups, &[]);
    let mut ids = HashSet::new();

    for group in groups {
        if !ids.insert(group.id.as_str()) {
            return Err(ChartError::DuplicateGroup(group.id.clone()));
        }
        if let Some(parent) = group.parent_group_id.as_deref() {
            if index.group(parent).is_none() {
                return Err(ChartError::UnknownParent(parent.to_string()));
            }
        }
        index.group_path(&group.id)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str, group_type: GroupType, parent: Option<&str>) -> LedgerGroup {
        LedgerGroup::new(
            id.to_string(),
            id.to_string(),
            group_type,
            parent.map(str::to_string),
        )
    }

    #[test]
    fn test_bank_group_rolls_up_to_current_assets() {
        let groups = vec![
            group("ca", GroupType::CurrentAssets, None),
            group("bank", GroupType::Bank, Some("ca")),
            group("suspense", GroupType::Suspense, None),
        ];
        let ledgers = vec![
            Ledger::new("hdfc".into(), "HDFC".into(), "bank".into()),
            Ledger::new("misc".into(), "Misc".into(), "suspense".into()),
            Ledger::new("lost".into(), "Lost".into(), "nowhere".into()),
        ];
        let index = ChartIndex::new(&groups, &ledgers);

        assert_eq!(
            index.place_ledger(index.ledger("hdfc").unwrap()),
            Ok(StatementBucket::CurrentAssets)
        );
        assert!(matches!(
            index.place_ledger(index.ledger("misc").unwrap()),
            Err(EngineWarning::InvalidGroupType { group_type: GroupType::Suspense, .. })
        ));
        assert!(matches!(
            index.place_ledger(index.ledger("lost").unwrap()),
            Err(EngineWarning::DanglingGroup { .. })
        ));
    }

    #[test]
    fn test_own_type_wins_over_parent() {
        let groups = vec![
            group("ca", GroupType::CurrentAssets, None),
            group("stock", GroupType::ClosingStock, Some("ca")),
        ];
        let index = ChartIndex::new(&groups, &[]);
        assert_eq!(
            index.resolve_group("stock").unwrap(),
            Placement::Bucket(StatementBucket::ClosingStock)
        );
    }

    #[test]
    fn test_group_path_and_children() {
        let groups = vec![
            group("cl", GroupType::CurrentLiabilities, None),
            group("creditors", GroupType::SundryCreditors, Some("cl")),
            group("taxes", GroupType::DutiesAndTaxes, Some("cl")),
        ];
        let index = ChartIndex::new(&groups, &[]);

        let path: Vec<_> = index
            .group_path("creditors")
            .unwrap()
            .iter()
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(path, vec!["cl", "creditors"]);

        let children: Vec<_> = index.child_groups("cl").iter().map(|g| g.id.as_str()).collect();
        assert_eq!(children, vec!["creditors", "taxes"]);
        assert!(validate_hierarchy(&groups).is_ok());
    }

    #[test]
    fn test_cycle_detected() {
        let groups = vec![
            group("a", GroupType::Bank, Some("b")),
            group("b", GroupType::Cash, Some("a")),
        ];
        let index = ChartIndex::new(&groups, &[]);
        assert!(matches!(index.resolve_group("a"), Err(ChartError::Cycle(_))));
        assert!(matches!(validate_hierarchy(&groups), Err(ChartError::Cycle(_))));

        let ledger = Ledger::new("l".into(), "L".into(), "a".into());
        assert!(matches!(
            index.place_ledger(&ledger),
            Err(EngineWarning::GroupCycle { .. })
        ));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let groups = vec![group("child", GroupType::Cash, Some("ghost"))];
        assert_eq!(
            validate_hierarchy(&groups),
            Err(ChartError::UnknownParent("ghost".to_string()))
        );
    }
}
