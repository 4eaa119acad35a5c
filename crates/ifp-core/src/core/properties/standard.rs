use phf::{Map, phf_map};

type Templates = &'static [(&'static str, &'static str)];

/// Backbone groups shared by every standard amino acid.
pub(super) const BACKBONE: Templates = &[
    ("N", "Atom,Donor"),
    ("CA", "Atom"),
    ("C", "Atom"),
    ("O", "Atom,Acceptor"),
    ("OXT", "Atom,Acceptor"),
    ("C,O,OXT", "NegativelyIonizable"),
];

/// Proline's backbone nitrogen carries no hydrogen.
pub(super) const PROLINE_BACKBONE: Templates = &[
    ("N", "Atom"),
    ("CA", "Atom"),
    ("C", "Atom"),
    ("O", "Atom,Acceptor"),
    ("OXT", "Atom,Acceptor"),
    ("C,O,OXT", "NegativelyIonizable"),
];

#[rustfmt::skip]
const ALA: Templates = &[("CB", "Atom,Hydrophobic")];
#[rustfmt::skip]
const ARG: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom,Hydrophobic"), ("CD", "Atom"),
    ("NE", "Atom,Donor"), ("CZ", "Atom"), ("NH1", "Atom,Donor"), ("NH2", "Atom,Donor"),
    ("NE,CZ,NH1,NH2", "PositivelyIonizable"),
];
#[rustfmt::skip]
const ASN: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom"), ("OD1", "Atom,Acceptor"), ("ND2", "Atom,Donor"),
];
#[rustfmt::skip]
const ASP: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom"), ("OD1", "Atom,Acceptor"), ("OD2", "Atom,Acceptor"),
    ("CG,OD1,OD2", "NegativelyIonizable"),
];
#[rustfmt::skip]
const CYS: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("SG", "Atom,Acceptor,Donor,Hydrophobic"),
];
#[rustfmt::skip]
const GLN: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom,Hydrophobic"), ("CD", "Atom"),
    ("OE1", "Atom,Acceptor"), ("NE2", "Atom,Donor"),
];
#[rustfmt::skip]
const GLU: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom,Hydrophobic"), ("CD", "Atom"),
    ("OE1", "Atom,Acceptor"), ("OE2", "Atom,Acceptor"),
    ("CD,OE1,OE2", "NegativelyIonizable"),
];
const GLY: Templates = &[];
#[rustfmt::skip]
const HIS: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom"), ("ND1", "Atom,Acceptor,Donor"),
    ("CD2", "Atom"), ("CE1", "Atom"), ("NE2", "Atom,Acceptor,Donor"),
    ("CG,ND1,CD2,CE1,NE2", "Aromatic"),
];
#[rustfmt::skip]
const ILE: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG1", "Atom,Hydrophobic"), ("CG2", "Atom,Hydrophobic"),
    ("CD1", "Atom,Hydrophobic"),
];
#[rustfmt::skip]
const LEU: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom,Hydrophobic"), ("CD1", "Atom,Hydrophobic"),
    ("CD2", "Atom,Hydrophobic"),
];
#[rustfmt::skip]
const LYS: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom,Hydrophobic"), ("CD", "Atom,Hydrophobic"),
    ("CE", "Atom"), ("NZ", "Atom,Donor,PositivelyIonizable"),
];
#[rustfmt::skip]
const MET: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom,Hydrophobic"), ("SD", "Atom,Acceptor,Hydrophobic"),
    ("CE", "Atom,Hydrophobic"),
];
#[rustfmt::skip]
const PHE: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom,Hydrophobic"), ("CD1", "Atom,Hydrophobic"),
    ("CD2", "Atom,Hydrophobic"), ("CE1", "Atom,Hydrophobic"), ("CE2", "Atom,Hydrophobic"),
    ("CZ", "Atom,Hydrophobic"), ("CG,CD1,CD2,CE1,CE2,CZ", "Aromatic"),
];
#[rustfmt::skip]
const PRO: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom,Hydrophobic"), ("CD", "Atom"),
];
#[rustfmt::skip]
const SER: Templates = &[("CB", "Atom"), ("OG", "Atom,Acceptor,Donor")];
#[rustfmt::skip]
const THR: Templates = &[
    ("CB", "Atom"), ("OG1", "Atom,Acceptor,Donor"), ("CG2", "Atom,Hydrophobic"),
];
#[rustfmt::skip]
const TRP: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom,Hydrophobic"), ("CD1", "Atom"),
    ("NE1", "Atom,Donor"), ("CE2", "Atom"), ("CD2", "Atom,Hydrophobic"),
    ("CE3", "Atom,Hydrophobic"), ("CZ2", "Atom,Hydrophobic"), ("CZ3", "Atom,Hydrophobic"),
    ("CH2", "Atom,Hydrophobic"),
    ("CG,CD1,NE1,CE2,CD2", "Aromatic"), ("CD2,CE2,CE3,CZ2,CZ3,CH2", "Aromatic"),
];
#[rustfmt::skip]
const TYR: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG", "Atom,Hydrophobic"), ("CD1", "Atom,Hydrophobic"),
    ("CD2", "Atom,Hydrophobic"), ("CE1", "Atom,Hydrophobic"), ("CE2", "Atom,Hydrophobic"),
    ("CZ", "Atom"), ("OH", "Atom,Acceptor,Donor"), ("CG,CD1,CD2,CE1,CE2,CZ", "Aromatic"),
];
#[rustfmt::skip]
const VAL: Templates = &[
    ("CB", "Atom,Hydrophobic"), ("CG1", "Atom,Hydrophobic"), ("CG2", "Atom,Hydrophobic"),
];
const WATER: Templates = &[("O", "Atom,Acceptor,Donor")];

/// Side-chain groups of the standard amino acids.
#[rustfmt::skip]
pub(super) static SIDECHAINS: Map<&'static str, Templates> = phf_map! {
    "ALA" => ALA, "ARG" => ARG, "ASN" => ASN, "ASP" => ASP, "CYS" => CYS,
    "GLN" => GLN, "GLU" => GLU, "GLY" => GLY, "HIS" => HIS, "ILE" => ILE,
    "LEU" => LEU, "LYS" => LYS, "MET" => MET, "PHE" => PHE, "PRO" => PRO,
    "SER" => SER, "THR" => THR, "TRP" => TRP, "TYR" => TYR, "VAL" => VAL,
};

/// Water compounds carry no backbone.
#[rustfmt::skip]
pub(super) static WATERS: Map<&'static str, Templates> = phf_map! {
    "HOH" => WATER, "WAT" => WATER, "DOD" => WATER,
};
