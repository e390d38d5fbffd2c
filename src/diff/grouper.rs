//! Collapse sibling file entries into one synthetic `FileGroup` node.

use super::node::{RawDiffKind, RawDiffNode};

/// Appended to the first grouped file's path to form the group's path.
pub const GROUP_PATH_SUFFIX: &str = "#file-group";

/// Default label template; `{n}` is replaced with the member count.
pub const DEFAULT_GROUP_LABEL: &str = "{n} file diff nodes";

/// Synthetic aggregate of the non-folder entries of one sibling list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    pub path: String,
    pub name: String,
    pub delta_size: i64,
    pub delta_alloc: i64,
    /// `|New| - |Removed|`.
    pub delta_file_count: i64,
    /// Members in bucket order: New, then Removed, then Changed.
    pub members: Vec<RawDiffNode>,
}

/// One entry of a grouped sibling list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sibling {
    Entry(RawDiffNode),
    Group(FileGroup),
}

/// Group a freshly fetched sibling list.
///
/// Folders keep their original order. If any non-folder entries exist,
/// they are removed and a single [`FileGroup`] is appended after the
/// folders. Must only run once per list, on backend output.
pub fn group_siblings(nodes: Vec<RawDiffNode>, label_template: &str) -> Vec<Sibling> {
    let mut folders = Vec::new();
    let mut new = Vec::new();
    let mut removed = Vec::new();
    let mut changed = Vec::new();
    let mut first_file_path: Option<String> = None;

    for node in nodes {
        if node.folder {
            folders.push(Sibling::Entry(node));
            continue;
        }
        if first_file_path.is_none() {
            first_file_path = Some(node.path.clone());
        }
        match node.kind {
            RawDiffKind::New => new.push(node),
            RawDiffKind::Removed => removed.push(node),
            RawDiffKind::Changed => changed.push(node),
        }
    }

    let Some(first_path) = first_file_path else {
        return folders;
    };

    let delta_file_count = count(&new).saturating_sub(count(&removed));
    let mut members = new;
    members.append(&mut removed);
    members.append(&mut changed);

    let delta_size = saturating_sum(members.iter().map(|m| m.delta_size));
    let delta_alloc = saturating_sum(members.iter().map(|m| m.delta_alloc));
    let name = label_template.replace("{n}", &members.len().to_string());

    folders.push(Sibling::Group(FileGroup {
        path: format!("{}{}", first_path, GROUP_PATH_SUFFIX),
        name,
        delta_size,
        delta_alloc,
        delta_file_count,
        members,
    }));
    folders
}

/// Sum that clamps at the `i64` bounds instead of overflowing.
fn saturating_sum(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0i64, i64::saturating_add)
}

fn count(nodes: &[RawDiffNode]) -> i64 {
    i64::try_from(nodes.len()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(path: &str, kind: RawDiffKind, folder: bool, size: i64) -> RawDiffNode {
        RawDiffNode {
            path: path.to_string(),
            kind,
            folder,
            delta_size: size,
            delta_alloc: size.saturating_mul(2),
            delta_n_files: 0,
            delta_n_folders: 0,
        }
    }

    fn group_of(siblings: &[Sibling]) -> &FileGroup {
        siblings
            .iter()
            .find_map(|s| match s {
                Sibling::Group(g) => Some(g),
                Sibling::Entry(_) => None,
            })
            .expect("group present")
    }

    #[test]
    fn folders_and_files_from_scenario() {
        let input = vec![
            raw("/a", RawDiffKind::Changed, true, 0),
            raw("/b.txt", RawDiffKind::New, false, 100),
            raw("/c.txt", RawDiffKind::Removed, false, -50),
        ];
        let out = group_siblings(input, DEFAULT_GROUP_LABEL);
        assert_eq!(out.len(), 2);
        assert!(matches!(&out[0], Sibling::Entry(n) if n.path == "/a"));

        let group = group_of(&out);
        assert_eq!(group.delta_size, 50);
        assert_eq!(group.delta_file_count, 0);
        let paths: Vec<&str> = group.members.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["/b.txt", "/c.txt"]);
        assert_eq!(group.path, "/b.txt#file-group");
        assert_eq!(group.name, "2 file diff nodes");
    }

    #[test]
    fn only_folders_is_unchanged() {
        let input = vec![
            raw("/z", RawDiffKind::New, true, 5),
            raw("/a", RawDiffKind::Removed, true, -5),
        ];
        let out = group_siblings(input.clone(), DEFAULT_GROUP_LABEL);
        let expected: Vec<Sibling> = input.into_iter().map(Sibling::Entry).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_list_stays_empty() {
        assert!(group_siblings(Vec::new(), DEFAULT_GROUP_LABEL).is_empty());
    }

    #[test]
    fn members_are_bucketed_new_removed_changed() {
        let input = vec![
            raw("/changed", RawDiffKind::Changed, false, 1),
            raw("/removed", RawDiffKind::Removed, false, -2),
            raw("/dir", RawDiffKind::Changed, true, 0),
            raw("/new", RawDiffKind::New, false, 4),
            raw("/new2", RawDiffKind::New, false, 8),
        ];
        let out = group_siblings(input, DEFAULT_GROUP_LABEL);
        let group = group_of(&out);
        let paths: Vec<&str> = group.members.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["/new", "/new2", "/removed", "/changed"]);
        // path comes from the first encountered file, not the first bucket
        assert_eq!(group.path, "/changed#file-group");
        assert!(matches!(&out[0], Sibling::Entry(n) if n.path == "/dir"));
    }

    #[test]
    fn sums_and_counts_match_members() {
        let input = vec![
            raw("/n1", RawDiffKind::New, false, 10),
            raw("/n2", RawDiffKind::New, false, 20),
            raw("/n3", RawDiffKind::New, false, 30),
            raw("/r1", RawDiffKind::Removed, false, -7),
            raw("/c1", RawDiffKind::Changed, false, 3),
        ];
        let out = group_siblings(input, DEFAULT_GROUP_LABEL);
        assert_eq!(out.len(), 1);
        let group = group_of(&out);
        assert_eq!(group.delta_size, 56);
        assert_eq!(group.delta_alloc, 112);
        assert_eq!(group.delta_file_count, 2);
    }

    #[test]
    fn custom_label_template() {
        let input = vec![raw("/only.txt", RawDiffKind::Changed, false, 1)];
        let out = group_siblings(input, "files ({n})");
        assert_eq!(group_of(&out).name, "files (1)");
    }

    #[test]
    fn sums_clamp_instead_of_overflowing() {
        let input = vec![
            raw("/big1", RawDiffKind::New, false, i64::MAX),
            raw("/big2", RawDiffKind::New, false, 1),
        ];
        let out = group_siblings(input, DEFAULT_GROUP_LABEL);
        let group = group_of(&out);
        assert_eq!(group.delta_size, i64::MAX);
        assert_eq!(group.delta_alloc, i64::MAX);
        assert_eq!(group.delta_file_count, 2);

        let input = vec![
            raw("/gone1", RawDiffKind::Removed, false, i64::MIN),
            raw("/gone2", RawDiffKind::Removed, false, -1),
        ];
        let out = group_siblings(input, DEFAULT_GROUP_LABEL);
        assert_eq!(group_of(&out).delta_size, i64::MIN);
    }
}
