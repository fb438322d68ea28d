use super::{HelpBook, HelpFlag, HelpTopic, Section};

pub(crate) fn book() -> HelpBook<'static> {
    HelpBook {
        title: "QR Shelf",
        usage: "qs <command> [options]",
        topics: ALL_TOPICS,
        footer: &[
            "Items are addressed by their order number as shown by `qs list` (0 is the top).",
            "Use `qs help <command>` for details, e.g. `qs help move`.",
        ],
    }
}

const ALL_TOPICS: &[HelpTopic<'static>] = &[
    HelpTopic {
        name: "add",
        summary: "Add an empty video item at the top of the list.",
        usage: "qs add [text] [--type video|user|custom] [--note text]",
        details: &[
            "Every existing item moves down one place. When text is given it is stored and formatted for the item type in one step.",
        ],
        flags: &[
            HelpFlag { name: "--type <type>", desc: "Type for the new item (default video)." },
            HelpFlag { name: "--note <text>", desc: "Attach a note right away." },
        ],
        aliases: &["new"],
        section: Section::Command,
        examples: &["qs add", "qs add 12345", "qs add https://example.com --type custom"],
    },
    HelpTopic {
        name: "list",
        summary: "Show items in order with their notes and code state.",
        usage: "qs list [-s|--search text] [--codes] [--plain]",
        details: &[
            "Search matches notes and contents case-insensitively; the text is taken literally.",
            "Matches are highlighted; with --plain or NO_COLOR they are wrapped in [brackets].",
        ],
        flags: &[
            HelpFlag { name: "-s, --search <text>", desc: "Only show items whose note or content contains text." },
            HelpFlag { name: "--codes", desc: "Draw each unmasked QR code under its row." },
            HelpFlag { name: "--plain", desc: "Disable colors." },
        ],
        aliases: &["ls"],
        section: Section::Command,
        examples: &["qs list", "qs list -s tutorial --codes"],
    },
    HelpTopic {
        name: "show",
        summary: "Render one item's QR code.",
        usage: "qs show <order> [--remote] [--out file] [--reveal]",
        details: &[
            "The local backend draws the code with block characters. The remote backend fetches a PNG from QR_SHELF_ENDPOINT, retrying up to 3 times with a growing delay.",
            "Masked items print an overlay unless --reveal is given; a masked item's image is only fetched with --reveal.",
        ],
        flags: &[
            HelpFlag { name: "--remote", desc: "Use the remote image service for this call." },
            HelpFlag { name: "--out <file>", desc: "Where to write the fetched image (remote only)." },
            HelpFlag { name: "--reveal", desc: "Show the code even if the item is masked." },
        ],
        aliases: &["qr"],
        section: Section::Command,
        examples: &["qs show 0", "qs show 2 --remote --out code.png"],
    },
    HelpTopic {
        name: "set",
        summary: "Replace an item's content and format it for its type.",
        usage: "qs set <order> [--raw] [--] <text>",
        details: &[
            "Video items become scheme://video/<id>, user items scheme://space/<id>; custom items are stored as typed. Content that already starts with scheme:// is left alone.",
            "Flags go before the text; everything after the first word of text, or after --, is stored as typed.",
        ],
        flags: &[HelpFlag { name: "--raw", desc: "Store the text without formatting." }],
        aliases: &["edit"],
        section: Section::Command,
        examples: &["qs set 0 BV1xx411c7mD", "qs set 2 --raw -- --not-a-flag"],
    },
    HelpTopic {
        name: "note",
        summary: "Set or clear an item's note.",
        usage: "qs note <order> [text...]",
        details: &["Without text the note is cleared."],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["qs note 0 watch later"],
    },
    HelpTopic {
        name: "type",
        summary: "Change an item's type; clears its content and note.",
        usage: "qs type <order> video|user|custom",
        details: &[],
        flags: &[],
        aliases: &["retype"],
        section: Section::Command,
        examples: &["qs type 1 user"],
    },
    HelpTopic {
        name: "delete",
        summary: "Remove an item; the rest are renumbered.",
        usage: "qs delete <order>",
        details: &[],
        flags: &[],
        aliases: &["rm"],
        section: Section::Command,
        examples: &["qs delete 3"],
    },
    HelpTopic {
        name: "top",
        summary: "Move an item to the top.",
        usage: "qs top <order>",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["qs top 4"],
    },
    HelpTopic {
        name: "move",
        summary: "Move an item to another item's position.",
        usage: "qs move <from> <to>",
        details: &[
            "The item is taken out and inserted where <to> was, like a drag and drop. A <to> past the end moves it to the bottom.",
        ],
        flags: &[],
        aliases: &["mv"],
        section: Section::Command,
        examples: &["qs move 0 2"],
    },
    HelpTopic {
        name: "mask",
        summary: "Toggle hiding an item's code behind an overlay.",
        usage: "qs mask <order>",
        details: &["The masked state is saved and survives restarts."],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["qs mask 0"],
    },
    HelpTopic {
        name: "migrate",
        summary: "Upgrade stored items from the old time-ordered format.",
        usage: "qs migrate",
        details: &[
            "This also happens automatically on every load; the command reports what was done. The original items are kept under qrItemsLegacy in storage.json.",
        ],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["qs migrate"],
    },
    HelpTopic {
        name: "path",
        summary: "Print the storage file location.",
        usage: "qs path",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &[],
    },
    HelpTopic {
        name: "help",
        summary: "Show help for all commands or one topic.",
        usage: "qs help [topic]",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Command,
        examples: &["qs help list"],
    },
    HelpTopic {
        name: "QR_SHELF_DIR",
        summary: "Data directory (default ~/.qr_shelf).",
        usage: "QR_SHELF_DIR",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "QR_SHELF_SCHEME",
        summary: "URI scheme used when formatting content (default bilibili).",
        usage: "QR_SHELF_SCHEME",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "QR_SHELF_BACKEND",
        summary: "local (default) or remote.",
        usage: "QR_SHELF_BACKEND",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "QR_SHELF_ENDPOINT",
        summary: "Remote QR image service; QR_SHELF_SIZE sets the edge in pixels (default 240).",
        usage: "QR_SHELF_ENDPOINT",
        details: &[],
        flags: &[],
        aliases: &["QR_SHELF_SIZE"],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "QR_SHELF_OFFLINE",
        summary: "When set, remote rendering fails at once without network calls.",
        usage: "QR_SHELF_OFFLINE",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "QR_SHELF_LOG",
        summary: "Log filter, e.g. debug or qr_shelf=info (default warn).",
        usage: "QR_SHELF_LOG",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
    HelpTopic {
        name: "NO_COLOR",
        summary: "Disable colored output.",
        usage: "NO_COLOR",
        details: &[],
        flags: &[],
        aliases: &[],
        section: Section::Environment,
        examples: &[],
    },
];
