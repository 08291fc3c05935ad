/// A presentation `styles.xml` exercising every style section the importer
/// understands.
pub const PRESENTATION_STYLES: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles
    xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
    xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0"
    xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0"
    xmlns:presentation="urn:oasis:names:tc:opendocument:xmlns:presentation:1.0"
    xmlns:svg="urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0"
    xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0"
    xmlns:number="urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0"
    xmlns:xlink="http://www.w3.org/1999/xlink"
    office:version="1.3">
  <office:styles>
    <draw:stroke-dash draw:name="Fine_20_Dashed" draw:display-name="Fine Dashed" draw:style="rect" draw:dots1="1" draw:dots1-length="0.05cm" draw:distance="0.05cm"/>
    <draw:gradient draw:name="Sky" draw:display-name="Sky Blue" draw:style="linear" draw:start-color="#ffffff" draw:end-color="#729fcf"/>
    <number:date-style style:name="D3">
      <number:day number:style="long"/>
      <number:text>/</number:text>
      <number:month number:style="long"/>
      <number:text>/</number:text>
      <number:year number:style="long"/>
    </number:date-style>
    <style:default-style style:family="graphic">
      <style:graphic-properties svg:stroke-color="#3465a4" draw:fill-color="#729fcf" draw:auto-grow-height="true"/>
    </style:default-style>
    <style:style style:name="standard" style:family="graphic">
      <style:graphic-properties svg:stroke-width="0cm" draw:fill-color="#ffffff" draw:auto-grow-height="false"/>
    </style:style>
    <style:style style:name="objectwithoutfill" style:family="graphic" style:parent-style-name="standard">
      <style:graphic-properties draw:fill="none"/>
    </style:style>
    <style:style style:name="Dashed_20_Line" style:display-name="Dashed Line" style:family="graphic" style:parent-style-name="standard">
      <style:graphic-properties draw:stroke="dash" draw:stroke-dash="Fine_20_Dashed"/>
    </style:style>
    <style:style style:name="Sky_20_Fill" style:display-name="Sky Fill" style:family="graphic" style:parent-style-name="Dashed_20_Line">
      <style:graphic-properties draw:fill="gradient" draw:fill-gradient-name="Sky"/>
    </style:style>
    <style:style style:name="orphan" style:family="graphic" style:parent-style-name="missing"/>
    <style:style style:name="Default-background" style:family="presentation">
      <style:graphic-properties draw:stroke="none" draw:fill="none"/>
    </style:style>
    <style:style style:name="Default-outline1" style:family="presentation">
      <style:graphic-properties draw:auto-grow-height="false"/>
    </style:style>
    <style:style style:name="Default-outline2" style:family="presentation" style:parent-style-name="Default-outline1"/>
    <style:style style:name="Title_20_Master-title" style:display-name="Title Master-title" style:family="presentation">
      <style:graphic-properties draw:fill-color="#ff0000"/>
    </style:style>
    <style:style style:name="Title_20_Master-subtitle" style:display-name="Title Master-subtitle" style:family="presentation" style:parent-style-name="Title_20_Master-title"/>
    <style:style style:name="default" style:family="table-cell">
      <style:table-cell-properties fo:background-color="#eeeeee" fo:padding-left="0.1cm"/>
    </style:style>
    <style:style style:name="gray1" style:family="table-cell" style:parent-style-name="default">
      <style:table-cell-properties fo:background-color="#cccccc"/>
    </style:style>
    <style:presentation-page-layout style:name="AL1T0">
      <presentation:placeholder presentation:object="title" svg:x="2.058cm" svg:y="1.743cm" svg:width="23.912cm" svg:height="3.507cm"/>
      <presentation:placeholder presentation:object="subtitle" svg:x="2.058cm" svg:y="5.838cm" svg:width="23.912cm" svg:height="13.23cm"/>
    </style:presentation-page-layout>
    <style:presentation-page-layout style:name="AL2T1">
      <presentation:placeholder presentation:object="title" svg:x="2.058cm" svg:y="1.743cm" svg:width="23.912cm" svg:height="3.507cm"/>
      <presentation:placeholder presentation:object="outline" svg:x="2.058cm" svg:y="5.838cm" svg:width="23.912cm" svg:height="13.23cm"/>
    </style:presentation-page-layout>
    <style:presentation-page-layout style:name="AL3T3">
      <presentation:placeholder presentation:object="title" svg:x="2.058cm" svg:y="1.743cm" svg:width="23.912cm" svg:height="3.507cm"/>
      <presentation:placeholder presentation:object="outline" svg:x="2.058cm" svg:y="5.838cm" svg:width="11.67cm" svg:height="13.23cm"/>
      <presentation:placeholder presentation:object="object" svg:x="14.312cm" svg:y="5.838cm" svg:width="11.67cm" svg:height="13.23cm"/>
    </style:presentation-page-layout>
    <style:presentation-page-layout style:name="AL4T12">
      <presentation:placeholder presentation:object="handout" svg:x="2.058cm" svg:y="1.743cm" svg:width="10.556cm" svg:height="-0.233cm"/>
      <presentation:placeholder presentation:object="handout" svg:x="15.414cm" svg:y="1.743cm" svg:width="10.556cm" svg:height="-0.233cm"/>
      <presentation:placeholder presentation:object="handout" svg:x="2.058cm" svg:y="3.612cm" svg:width="10.556cm" svg:height="-0.233cm"/>
      <presentation:placeholder presentation:object="handout" svg:x="15.414cm" svg:y="3.612cm" svg:width="10.556cm" svg:height="-0.233cm"/>
    </style:presentation-page-layout>
    <presentation:header-decl presentation:name="hdr1">Quarterly review</presentation:header-decl>
    <presentation:footer-decl presentation:name="ftr1">Company &amp; Partners</presentation:footer-decl>
    <presentation:date-time-decl presentation:name="dtd1" presentation:source="current-date" style:data-style-name="D3"/>
  </office:styles>
  <office:automatic-styles>
    <style:page-layout style:name="PM0">
      <style:page-layout-properties fo:margin-top="0cm" fo:margin-bottom="0cm" fo:margin-left="0cm" fo:margin-right="0cm" fo:page-width="21cm" fo:page-height="29.7cm" style:print-orientation="portrait"/>
    </style:page-layout>
    <style:page-layout style:name="PM1">
      <style:page-layout-properties fo:margin-top="0cm" fo:margin-bottom="0cm" fo:margin-left="0cm" fo:margin-right="0cm" fo:page-width="28cm" fo:page-height="15.75cm" style:print-orientation="landscape"/>
    </style:page-layout>
    <style:style style:name="dp1" style:family="drawing-page">
      <style:drawing-page-properties presentation:display-footer="true" presentation:display-date-time="true" style:data-style-name="D3"/>
    </style:style>
    <style:style style:name="dp2" style:family="drawing-page">
      <style:drawing-page-properties style:data-style-name="D99">
        <presentation:sound xlink:href="../media/chime.wav" xlink:type="simple"/>
      </style:drawing-page-properties>
    </style:style>
    <style:style style:name="gr1" style:family="graphic" style:parent-style-name="objectwithoutfill">
      <style:graphic-properties draw:fill-color="#000000"/>
    </style:style>
    <style:style style:name="Mpr1" style:family="presentation" style:parent-style-name="Default-outline1"/>
  </office:automatic-styles>
  <office:master-styles>
    <style:handout-master presentation:presentation-page-layout-name="AL4T12" style:page-layout-name="PM0"/>
    <style:master-page style:name="Default" style:page-layout-name="PM1" draw:style-name="dp1" presentation:use-footer-name="ftr1" presentation:use-date-time-name="dtd1"/>
    <style:master-page style:name="Title_20_Master" style:display-name="Title Master" style:page-layout-name="PM1" draw:style-name="dp1"/>
  </office:master-styles>
</office:document-styles>
"##;

/// Names of the style families a document for [`PRESENTATION_STYLES`]
/// exposes: the shared families plus one per master page.
pub const PRESENTATION_FAMILIES: &[&str] = &["graphics", "cell", "Default", "Title Master"];

/// A synthetic `styles.xml` with `count` graphics styles chained by parent,
/// each carrying a handful of properties.
pub fn generated_styles(count: usize) -> String {
    let mut xml = String::with_capacity(count * 256 + 256);
    xml.push_str("<office:document-styles><office:styles>");
    xml.push_str(
        r##"<style:default-style style:family="graphic"><style:graphic-properties svg:stroke-color="#3465a4" draw:fill-color="#729fcf"/></style:default-style>"##,
    );
    for idx in 0..count {
        xml.push_str(&format!(
            r##"<style:style style:name="s{idx}" style:display-name="Style {idx}" style:family="graphic""##
        ));
        if idx > 0 {
            xml.push_str(&format!(r#" style:parent-style-name="s{}""#, idx - 1));
        }
        xml.push_str(&format!(
            r##"><style:graphic-properties draw:fill-color="#{:06x}" svg:stroke-width="{}mm" draw:auto-grow-height="{}"/></style:style>"##,
            idx * 37 % 0xffffff,
            idx % 10,
            idx % 2 == 0
        ));
    }
    xml.push_str("</office:styles></office:document-styles>");
    xml
}
